const RECORD_SLICE_LENGTH: usize = 2_000;

/// Splits `text` into a head slice and a tail slice of at most
/// `RECORD_SLICE_LENGTH` bytes each, for the execution record's
/// `stdout_head`/`stdout_tail` fields (spec §4.5: "the execution record
/// stores only a head/tail slice for the report"). Full output still goes
/// to the per-tool output file untouched.
pub fn head_tail(text: &str) -> (String, String) {
    if text.len() <= RECORD_SLICE_LENGTH * 2 {
        (text.to_string(), String::new())
    } else {
        let head = text[..RECORD_SLICE_LENGTH].to_string();
        let tail = text[text.len() - RECORD_SLICE_LENGTH..].to_string();
        (head, tail)
    }
}
