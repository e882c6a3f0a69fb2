//! Header values checked one by one against th260defin.h (v3.1.0.2).

use th260_sys::consts::*;

#[test]
fn test_library_and_string_sizes() {
    assert_eq!(LIB_VERSION, "3.1");
    assert_eq!(MAXSTRLEN_LIBVER, 8);
    assert_eq!(MAXSTRLEN_ERRSTR, 40);
    assert_eq!(MAXSTRLEN_SERIAL, 8);
    assert_eq!(MAXSTRLEN_MODEL, 16);
    assert_eq!(MAXSTRLEN_PART, 8);
    assert_eq!(MAXSTRLEN_VERSION, 16);
    assert_eq!(MAXSTRLEN_WRNTXT, 16384);
    assert_eq!(HWIDENT_PICO, "TimeHarp 260 P");
    assert_eq!(HWIDENT_NANO, "TimeHarp 260 N");
}

#[test]
fn test_sizes_and_modes() {
    assert_eq!(MAXDEVNUM, 4);
    assert_eq!(MAXINPCHAN, 2);
    assert_eq!(MAXBINSTEPS, 22);
    assert_eq!(MAXHISTLEN, 32768);
    assert_eq!(MAXLENCODE, 5);
    assert_eq!(TTREADMAX, 131072);
    assert_eq!(TTREADMIN, 128);

    assert_eq!(MODE_HIST, 0);
    assert_eq!(MODE_T2, 2);
    assert_eq!(MODE_T3, 3);

    assert_eq!(MEASCTRL_SINGLESHOT_CTC, 0);
    assert_eq!(MEASCTRL_C1_GATE, 1);
    assert_eq!(MEASCTRL_C1_START_CTC_STOP, 2);
    assert_eq!(MEASCTRL_C1_START_C2_STOP, 3);

    assert_eq!(EDGE_RISING, 1);
    assert_eq!(EDGE_FALLING, 0);
    assert_eq!(TIMINGMODE_HIRES, 0);
    assert_eq!(TIMINGMODE_LORES, 1);
}

#[test]
fn test_feature_and_flag_masks() {
    assert_eq!(FEATURE_DLL, 0x0001);
    assert_eq!(FEATURE_TTTR, 0x0002);
    assert_eq!(FEATURE_MARKERS, 0x0004);
    assert_eq!(FEATURE_LOWRES, 0x0008);
    assert_eq!(FEATURE_TRIGOUT, 0x0010);
    assert_eq!(FEATURE_PROG_TD, 0x0020);

    assert_eq!(FLAG_OVERFLOW, 0x0001);
    assert_eq!(FLAG_FIFOFULL, 0x0002);
    assert_eq!(FLAG_SYNC_LOST, 0x0004);
    assert_eq!(FLAG_EVTS_DROPPED, 0x0008);
    assert_eq!(FLAG_SYSERROR, 0x0010);
    assert_eq!(FLAG_SOFTERROR, 0x0020);
}

#[test]
fn test_parameter_limits() {
    assert_eq!((SYNCDIVMIN, SYNCDIVMAX), (1, 8));
    assert_eq!((TRGLVLMIN, TRGLVLMAX), (-1200, 1200));
    assert_eq!((CFDLVLMIN, CFDLVLMAX), (-1200, 0));
    assert_eq!((CFDZCMIN, CFDZCMAX), (-40, 0));
    assert_eq!((CHANOFFSMIN, CHANOFFSMAX), (-99999, 99999));
    assert_eq!((OFFSETMIN, OFFSETMAX), (0, 100_000_000));
    assert_eq!((ACQTMIN, ACQTMAX), (1, 360_000_000));
    assert_eq!((STOPCNTMIN, STOPCNTMAX), (1, u32::MAX));
    assert_eq!((TRIGOUTMIN, TRIGOUTMAX), (0, 16_777_215));
    assert_eq!((HOLDOFFMIN, HOLDOFFMAX), (0, 25500));
    assert_eq!((TDCODEMIN, TDCODEMAX), (0, 7));
}

#[test]
fn test_warning_masks() {
    assert_eq!(WARNING_SYNC_RATE_ZERO, 0x0001);
    assert_eq!(WARNING_SYNC_RATE_VERY_LOW, 0x0002);
    assert_eq!(WARNING_SYNC_RATE_TOO_HIGH, 0x0004);
    assert_eq!(WARNING_INPT_RATE_ZERO, 0x0010);
    assert_eq!(WARNING_INPT_RATE_TOO_HIGH, 0x0040);
    assert_eq!(WARNING_INPT_RATE_RATIO, 0x0100);
    assert_eq!(WARNING_DIVIDER_GREATER_ONE, 0x0200);
    assert_eq!(WARNING_TIME_SPAN_TOO_SMALL, 0x0400);
    assert_eq!(WARNING_OFFSET_UNNECESSARY, 0x0800);
    assert_eq!(WARNING_DIVIDER_TOO_SMALL, 0x1000);
    assert_eq!(WARNING_COUNTS_DROPPED, 0x2000);
}
