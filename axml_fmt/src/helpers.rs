pub(crate) fn is_all_ascii_whitespace(s: &str) -> bool {
    !s.is_empty() && s.as_bytes().iter().all(|byte| byte.is_ascii_whitespace())
}

/// Attributes whose whole value is conventionally an object literal without braces,
/// such as `<template data="{{a: 1}}">` or `style="{{color: red}}"`.
///
/// The raw value isn't trimmed, so `style=" {{x}}"` isn't a candidate.
pub(crate) fn is_naked_object_candidate(tag_name: &str, attr_name: &str, raw_value: &str) -> bool {
    (tag_name == "template" && attr_name == "data")
        || (attr_name == "style" && raw_value.starts_with("{{"))
}

/// Collapse every whitespace run to a single space.
pub(crate) fn squash_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_whitespace = false;
    for c in s.chars() {
        if c.is_ascii_whitespace() {
            if !in_whitespace {
                result.push(' ');
            }
            in_whitespace = true;
        } else {
            result.push(c);
            in_whitespace = false;
        }
    }
    result
}
