//! Load-once / rollback / passthrough behaviour of the MMC410 trampolines,
//! driven through the in-process mock loader.

use std::cell::{Cell, RefCell};
use std::ffi::{c_char, c_int, CStr};

use dll_binding::mock::MockLoader;
use dll_binding::EntryPoints;
use mmc_sys::{MmcEntryPoints, MmcLibrary, COULD_NOT_FIND_FUNCTION, FAILED_TO_LOAD_DLL};

thread_local! {
    static MOVE_ARGS: Cell<Option<(c_int, c_int)>> = const { Cell::new(None) };
    static CALLS: Cell<usize> = const { Cell::new(0) };
    static POSITION: Cell<c_int> = const { Cell::new(0) };
    static LAST_COUNT: Cell<Option<u16>> = const { Cell::new(None) };
    static LAST_COMMAND: RefCell<String> = const { RefCell::new(String::new()) };
}

const MOVE_RESULT: c_int = 17;

extern "system" fn unused() -> c_int {
    unreachable!("stub registered only to satisfy resolution")
}

extern "system" fn mock_move_a(axis: c_int, position: c_int) -> c_int {
    CALLS.with(|c| c.set(c.get() + 1));
    MOVE_ARGS.with(|a| a.set(Some((axis, position))));
    MOVE_RESULT
}

extern "system" fn mock_get_pos() -> c_int {
    CALLS.with(|c| c.set(c.get() + 1));
    POSITION.with(Cell::get)
}

extern "system" fn mock_get_string(report: *mut c_char, count: u16) -> c_int {
    LAST_COUNT.with(|c| c.set(Some(count)));
    let reply = b"P:+0001000\0";
    let n = reply.len().min(count as usize);
    // SAFETY: the caller provides `count` writable bytes.
    unsafe { std::ptr::copy_nonoverlapping(reply.as_ptr().cast::<c_char>(), report, n) };
    n as c_int
}

extern "system" fn mock_send_command(command: *mut c_char) -> c_int {
    // SAFETY: the caller passes a NUL-terminated string.
    let text = unsafe { CStr::from_ptr(command) }.to_string_lossy().into_owned();
    LAST_COMMAND.with(|c| *c.borrow_mut() = text);
    0
}

/// Every export resolves; only the ones above are callable.
fn full_library() -> MockLoader {
    MockLoader::new()
        .with_symbols(MmcEntryPoints::SYMBOLS, unused as *const ())
        .with_symbol("MMC_moveA", mock_move_a as *const ())
        .with_symbol("MMC_getPos", mock_get_pos as *const ())
        .with_symbol("MMC_getString", mock_get_string as *const ())
        .with_symbol("MMC_sendCommand", mock_send_command as *const ())
}

fn reset() {
    CALLS.with(|c| c.set(0));
    MOVE_ARGS.with(|a| a.set(None));
}

#[test]
fn test_two_different_calls_load_once() {
    reset();
    let loader = full_library();
    let stats = loader.stats();
    let mmc = MmcLibrary::with_loader(loader);

    POSITION.with(|p| p.set(-250));
    assert_eq!(unsafe { mmc.move_a(1, 5) }, MOVE_RESULT);
    assert_eq!(unsafe { mmc.get_pos() }, -250);

    assert_eq!(stats.loads(), 1);
    assert_eq!(stats.lookups().len(), 32);
    assert!(mmc.is_loaded());
}

#[test]
fn test_missing_fifth_symbol_rolls_back_and_retries() {
    reset();
    let loader = full_library().without_symbol("MMC_COM_clear");
    let stats = loader.stats();
    let mmc = MmcLibrary::with_loader(loader.clone());

    assert_eq!(unsafe { mmc.move_a(3, 1000) }, COULD_NOT_FIND_FUNCTION);
    assert_eq!(stats.lookups().len(), 5);
    assert_eq!(stats.lookups().last().map(String::as_str), Some("MMC_COM_clear"));
    assert_eq!(stats.releases(), 1);
    assert!(!mmc.is_loaded());
    assert_eq!(CALLS.with(Cell::get), 0);

    // a second call starts from scratch
    assert_eq!(unsafe { mmc.move_a(3, 1000) }, COULD_NOT_FIND_FUNCTION);
    assert_eq!(stats.loads(), 2);

    // and succeeds once the export shows up
    loader.insert_symbol("MMC_COM_clear", unused as *const ());
    assert_eq!(unsafe { mmc.move_a(3, 1000) }, MOVE_RESULT);
    assert_eq!(stats.loads(), 3);
    assert_eq!(stats.releases(), 2);
}

#[test]
fn test_arguments_and_results_pass_through() {
    reset();
    let mmc = MmcLibrary::with_loader(full_library());

    assert_eq!(unsafe { mmc.move_a(3, 1000) }, MOVE_RESULT);
    assert_eq!(MOVE_ARGS.with(Cell::get), Some((3, 1000)));

    assert_eq!(unsafe { mmc.move_a(-1, i32::MIN + 5) }, MOVE_RESULT);
    assert_eq!(MOVE_ARGS.with(Cell::get), Some((-1, i32::MIN + 5)));

    // vendor sentinels are not interpreted
    POSITION.with(|p| p.set(i32::MAX - 2));
    assert_eq!(unsafe { mmc.get_pos() }, i32::MAX - 2);
}

#[test]
fn test_buffers_pass_through() {
    let mmc = MmcLibrary::with_loader(full_library());

    let mut buf = [0 as c_char; 64];
    let written = unsafe { mmc.get_string(buf.as_mut_ptr(), 64) };
    assert_eq!(written, 11);
    assert_eq!(LAST_COUNT.with(Cell::get), Some(64));
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    assert_eq!(text.to_str().expect("ascii"), "P:+0001000");

    let mut command = *b"FE1\0";
    assert_eq!(unsafe { mmc.send_command(command.as_mut_ptr().cast()) }, 0);
    assert_eq!(LAST_COMMAND.with(|c| c.borrow().clone()), "FE1");
}

#[test]
fn test_load_failure_never_resolves_or_calls() {
    reset();
    let loader = full_library().failing();
    let stats = loader.stats();
    let mmc = MmcLibrary::with_loader(loader);

    assert_eq!(unsafe { mmc.move_a(3, 1000) }, FAILED_TO_LOAD_DLL);
    assert_eq!(unsafe { mmc.get_pos() }, FAILED_TO_LOAD_DLL);
    assert_eq!(unsafe { mmc.com_close() }, FAILED_TO_LOAD_DLL);

    assert!(stats.lookups().is_empty());
    assert_eq!(CALLS.with(Cell::get), 0);
    assert_eq!(MOVE_ARGS.with(Cell::get), None);
    assert_ne!(FAILED_TO_LOAD_DLL, COULD_NOT_FIND_FUNCTION);
}

#[test]
fn test_repeated_calls_do_not_reload() {
    reset();
    let loader = full_library();
    let stats = loader.stats();
    let mmc = MmcLibrary::with_loader(loader);

    for i in 0..150 {
        POSITION.with(|p| p.set(i));
        assert_eq!(unsafe { mmc.get_pos() }, i);
    }
    assert_eq!(stats.loads(), 1);
    assert_eq!(stats.lookups().len(), 32);
    assert_eq!(CALLS.with(Cell::get), 150);
}

#[test]
fn test_explicit_ensure_loaded() {
    let loader = full_library().without_symbol("RED_waitStop");
    let mmc = MmcLibrary::with_loader(loader.clone());

    let err = mmc.ensure_loaded().expect_err("last export missing");
    assert!(err.to_string().contains("RED_waitStop"));
    assert_eq!(err.code(), COULD_NOT_FIND_FUNCTION);

    loader.insert_symbol("RED_waitStop", unused as *const ());
    mmc.ensure_loaded().expect("all exports present");
    assert!(mmc.is_loaded());
}
