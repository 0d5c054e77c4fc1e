//! Parsing of request scripts
//!
//! A script starts with the number of test cases on its own line, usually followed by a blank line.
//! Each test case is a run of lines holding one signed integer each and ends at a blank line or at the end of the
//! input:
//!
//! ```text
//! 2
//!
//! 5
//! 3
//! -1
//!
//! 10
//! -1
//! ```
//!
//! A positive value `n` requests an allocation of `n` elements.
//! A negative value `-k` frees the `k`-th currently allocated block, counting from the lowest address starting at 1.

use crate::error::HarnessError;

/// A single step of a test case
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Request {
    /// Allocate room for this many elements.
    Allocate(usize),
    /// Free the live block at this zero-based position in address order.
    Deallocate(usize),
}

impl Request {
    /// Parse one request line, returning `None` for lines that do not hold a usable request.
    fn parse(line: &str) -> Option<Self> {
        match line.parse::<i64>() {
            Ok(value) if value > 0 => Some(Request::Allocate(value as usize)),
            Ok(value) if value < 0 => Some(Request::Deallocate((-(value + 1)) as usize)),
            Ok(_) => {
                log::warn!("ignoring request 0 which neither allocates nor frees anything");
                None
            }
            Err(e) => {
                log::warn!("ignoring malformed request line {:?}: {}", line, e);
                None
            }
        }
    }
}

/// The requests of one test case in input order
#[derive(Debug, Default, Eq, PartialEq, Clone)]
pub struct TestCase {
    pub requests: Vec<Request>,
}

/// Split a script into its test cases.
///
/// When the script announces more test cases than it contains, the missing ones are empty.
pub fn parse_script(src: &str) -> Result<Vec<TestCase>, HarnessError> {
    let mut lines = src.lines().map(str::trim).peekable();

    let count_line = loop {
        match lines.next() {
            None => return Err(HarnessError::MissingCaseCount),
            Some("") => continue,
            Some(line) => break line,
        }
    };
    let count = count_line
        .parse::<usize>()
        .map_err(|_| HarnessError::InvalidCaseCount {
            line: count_line.to_string(),
        })?;
    log::debug!("script announces {} test cases", count);

    // the count is followed by a blank separator line
    if lines.peek() == Some(&"") {
        lines.next();
    }

    let mut cases = Vec::with_capacity(count);
    for _ in 0..count {
        let requests = lines
            .by_ref()
            .take_while(|line| !line.is_empty())
            .filter_map(Request::parse)
            .collect();
        cases.push(TestCase { requests });
    }

    if lines.any(|line| !line.is_empty()) {
        log::warn!(
            "script contains more than the announced {} test cases; ignoring the rest",
            count
        );
    }

    Ok(cases)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_single_case() {
        let cases = parse_script("1\n\n5\n3\n-1\n").unwrap();
        assert_eq!(
            cases,
            vec![TestCase {
                requests: vec![
                    Request::Allocate(5),
                    Request::Allocate(3),
                    Request::Deallocate(0)
                ]
            }]
        );
    }

    #[test]
    fn test_multiple_cases() {
        let cases = parse_script("2\n\n5\n-1\n\n10\n20\n-2\n").unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(
            cases[1].requests,
            [
                Request::Allocate(10),
                Request::Allocate(20),
                Request::Deallocate(1)
            ]
        );
    }

    #[test]
    fn test_missing_separator_after_count() {
        let cases = parse_script("1\n7\n").unwrap();
        assert_eq!(cases[0].requests, [Request::Allocate(7)]);
    }

    #[test]
    fn test_missing_cases_are_empty() {
        let cases = parse_script("3\n\n4\n").unwrap();
        assert_eq!(cases.len(), 3);
        assert!(cases[1].requests.is_empty());
        assert!(cases[2].requests.is_empty());
    }

    #[test]
    fn test_bad_lines_are_skipped() {
        let cases = parse_script("1\n\n4\nfour\n0\n -1 \r\n").unwrap();
        assert_eq!(
            cases[0].requests,
            [Request::Allocate(4), Request::Deallocate(0)]
        );
    }

    #[test]
    fn test_invalid_count() {
        assert_eq!(parse_script(""), Err(HarnessError::MissingCaseCount));
        assert_eq!(
            parse_script("many\n\n1\n"),
            Err(HarnessError::InvalidCaseCount {
                line: "many".to_string()
            })
        );
    }
}
