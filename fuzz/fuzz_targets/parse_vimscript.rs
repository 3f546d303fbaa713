#![no_main]

use libfuzzer_sys::fuzz_target;

// Any input may fail to parse, but nothing may panic, and whatever parses
// must print to source that parses back to the same tree.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(expr) = vimexpr::parse(s) {
            let printed = expr.to_string();
            if let Ok(reparsed) = vimexpr::parse(&printed) {
                assert_eq!(vimexpr::sexpr(&expr), vimexpr::sexpr(&reparsed), "{printed}");
            }
        }
    }
});
