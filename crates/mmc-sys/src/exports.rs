//! C-ABI surface with the vendor export names.
//!
//! Each function forwards to the process-wide [`MmcLibrary`] returned by
//! [`library`], which binds `MMC410.DLL` through the OS loader on first use.

#![allow(non_snake_case)]

use std::ffi::{c_char, c_int};

use once_cell::sync::Lazy;

use crate::MmcLibrary;

static LIBRARY: Lazy<MmcLibrary> = Lazy::new(MmcLibrary::new);

/// The binding shared by every exported function.
pub fn library() -> &'static MmcLibrary {
    &LIBRARY
}

macro_rules! export {
    ($( $export:ident => $method:ident ( $($arg:ident : $ty:ty),* ); )*) => {
        $(
            #[doc = concat!("Exported as `", stringify!($export), "`; see [`MmcLibrary::", stringify!($method), "`].")]
            ///
            /// # Safety
            ///
            /// Same contract as the vendor function of this name.
            #[no_mangle]
            pub unsafe extern "system" fn $export($($arg: $ty),*) -> c_int {
                unsafe { LIBRARY.$method($($arg),*) }
            }
        )*
    };
}

export! {
    MMC_COM_open => com_open(port_number: c_int, baudrate: c_int);
    MMC_COM_close => com_close();
    MMC_COM_setBuffer => com_set_buffer();
    MMC_COM_EOF => com_eof();
    MMC_COM_clear => com_clear();
    MMC_getChar => get_char(character: *mut c_char);
    MMC_getDLLversion => get_dll_version();
    MMC_getMacro => get_macro(macno: c_int, report: *mut c_char);
    MMC_getPos => get_pos();
    MDC_getPosErr => mdc_get_pos_err();
    MMC_getReport => get_report(command: *mut c_char, report: *mut c_char);
    MMC_getSTB => get_stb(bytenumber: c_int);
    MMC_getString => get_string(report: *mut c_char, count: u16);
    MMC_getStringCR => get_string_cr(report: *mut c_char);
    MMC_getVal => get_val(command_id: c_int);
    MMC_initNetwork => init_network(max_axis: c_int);
    MMC_moveA => move_a(axis: c_int, position: c_int);
    MMC_moveR => move_r(axis: c_int, shift: c_int);
    MDC_moving => mdc_moving();
    MST_moving => mst_moving();
    MMC_setDevice => set_device(axis: c_int);
    MMC_select => select(axis: c_int);
    MMC_sendChar => send_char(character: c_char);
    MMC_sendString => send_string(send_string: *mut c_char);
    MMC_sendCommand => send_command(command: *mut c_char);
    MDC_waitStop => mdc_wait_stop();
    MST_waitStop => mst_wait_stop();
    RED_getJoy => red_get_joy(axis: c_int);
    RED_getSCC => red_get_scc(command_id: c_int);
    RED_getReport => red_get_report(axis: c_int, command_id: c_int, report: *mut c_char);
    RED_moving => red_moving();
    RED_waitStop => red_wait_stop(axis: c_int);
}
