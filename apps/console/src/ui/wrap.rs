use textwrap::{word_splitters::WordSplitter, Options, WrapAlgorithm};

/// Word-wraps `text` to `width` display columns, one source line at a time.
/// Leading indentation is kept on the first row of each line. A width of
/// zero leaves lines untouched.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return text.lines().map(str::to_string).collect();
    }
    let options = Options::new(width)
        .word_splitter(WordSplitter::NoHyphenation)
        .wrap_algorithm(WrapAlgorithm::FirstFit);
    text.lines()
        .flat_map(|line| textwrap::wrap(line, &options))
        .map(|row| row.into_owned())
        .collect()
}

#[cfg(test)]
#[path = "tests/wrap_tests.rs"]
mod tests;
