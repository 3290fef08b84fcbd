#![no_main]
use filelog_core::format::{placeholder_count, str_format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (String, Vec<String>)| {
    let (template, values) = input;
    let args: Vec<&dyn std::fmt::Display> =
        values.iter().map(|v| v as &dyn std::fmt::Display).collect();
    let out = str_format(&template, &args);
    if values.is_empty() || placeholder_count(&template) == 0 {
        assert_eq!(out, template);
    }
});
