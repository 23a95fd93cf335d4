#![no_main]

use libfuzzer_sys::fuzz_target;
use valnum::{lvn::LocalValueNumbering, text::parse_program};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(statements) = parse_program(source) {
        let translation = LocalValueNumbering::default().run(statements.clone());
        assert!(translation.statements().len() <= statements.len() * 2);
    }
});
