#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);

    let config = match promlint::Config::from_yaml(&s) {
        Ok(c) => c,
        Err(_) => return,
    };
    let _ = promlint::policy::compile(&config);
});
