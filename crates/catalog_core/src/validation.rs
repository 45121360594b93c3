/// A search term is usable when something other than whitespace remains.
pub fn is_valid_input(value: &str) -> bool {
    !value.trim().is_empty()
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
