#![cfg(unix)]

use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, SIGPROF};
use rand::Rng;
use stacktrace::platform::Unwinder;
use stacktrace::{StackTrace, MAX_FRAMES};
use std::sync::atomic::{AtomicU32, Ordering};

const SAMPLE_HZ: libc::suseconds_t = 99;
const WANTED_SAMPLES: u32 = 100;

static DELIVERED: AtomicU32 = AtomicU32::new(0);
static CAPTURED: AtomicU32 = AtomicU32::new(0);

#[test]
fn test_capture_in_signal_handler() {
    // The first walk may have to load the unwinder, keep that out of the handler.
    assert!(!StackTrace::capture_with(&Unwinder).is_empty());
    #[cfg(not(target_os = "android"))]
    assert!(!StackTrace::new().is_empty());

    let action = SigAction::new(SigHandler::SigAction(on_sigprof), SaFlags::SA_SIGINFO, SigSet::empty());
    unsafe { sigaction(SIGPROF, &action).unwrap() };

    {
        let _timer = ProfTimer::start(SAMPLE_HZ);
        let mut rng = rand::thread_rng();
        while DELIVERED.load(Ordering::SeqCst) < WANTED_SAMPLES {
            let mut samples: Vec<u64> = (0..50_000).map(|_| rng.gen()).collect();
            samples.sort_unstable();
            std::hint::black_box(&samples);
        }
    }

    assert!(CAPTURED.load(Ordering::SeqCst) > 0);
}

/// Arms `ITIMER_PROF` at the given rate, disarms it on drop.
struct ProfTimer;

impl ProfTimer {
    fn start(hz: libc::suseconds_t) -> Self {
        let period = libc::timeval { tv_sec: 0, tv_usec: 1_000_000 / hz };
        arm(libc::itimerval { it_interval: period, it_value: period });
        ProfTimer
    }
}

impl Drop for ProfTimer {
    fn drop(&mut self) {
        let zero = libc::timeval { tv_sec: 0, tv_usec: 0 };
        arm(libc::itimerval { it_interval: zero, it_value: zero });
    }
}

fn arm(value: libc::itimerval) {
    let res = unsafe { setitimer(libc::ITIMER_PROF, &value, std::ptr::null_mut()) };
    assert_eq!(res, 0);
}

extern "C" {
    fn setitimer(which: libc::c_int, value: *const libc::itimerval, old: *mut libc::itimerval) -> libc::c_int;
}

extern "C" fn on_sigprof(_: libc::c_int, _: *mut libc::siginfo_t, _: *mut libc::c_void) {
    let trace = StackTrace::capture_with(&Unwinder);
    if !trace.is_empty() && trace.len() <= MAX_FRAMES {
        CAPTURED.fetch_add(1, Ordering::SeqCst);
    }
    DELIVERED.fetch_add(1, Ordering::SeqCst);
}
