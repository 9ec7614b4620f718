use stacktrace::platform::Unwinder;
use stacktrace::{Renderer, StackTrace, Strategy, Symbolizer};

fn main() {
    // Capture first, symbolize later.
    let trace = func1();

    println!("{} frames: {:?}", trace.len(), trace);

    // With the strategy picked for this process (see STACKTRACE_STRATEGY).
    trace.output_to_stream(&mut std::io::stdout()).unwrap();

    // With an explicit strategy.
    println!();
    trace
        .output_to_stream_with(Strategy::Execinfo.renderer().as_ref(), &mut std::io::stdout())
        .unwrap();

    // Or consume the lines yourself.
    let rendered = Symbolizer::new(Unwinder).render(&trace);
    for line in rendered.lines() {
        eprintln!("\t{}", line);
    }
}

#[inline(never)]
fn func1() -> StackTrace {
    func2()
}

#[inline(never)]
fn func2() -> StackTrace {
    StackTrace::new()
}

/*
Sample output on linux-gnu with STACKTRACE_STRATEGY=symbolize:

Backtrace:
	simple::func2 [0x55b0c1f0a1e4]
	simple::func1 [0x55b0c1f0a1c9]
	simple::main [0x55b0c1f0a05d]
	core::ops::function::FnOnce::call_once [0x55b0c1f0a31e]
	std::rt::lang_start::{{closure}} [0x55b0c1f0a2f1]
	std::rt::lang_start_internal [0x55b0c1f23b4d]
	std::rt::lang_start [0x55b0c1f0a2ca]
	main [0x55b0c1f0a10e]
	__libc_start_main [0x7f6a2de0f083]
	_start [0x55b0c1f09e4e]
*/
