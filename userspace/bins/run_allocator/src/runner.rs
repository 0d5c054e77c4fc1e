//! Replaying test cases against a fresh allocator

use crate::error::HarnessError;
use crate::requests::{parse_script, Request, TestCase};
use sentinel_alloc::{PayloadPtr, SentinelAllocator};
use std::io::Write;

/// The allocator every test case runs against: 1000 bytes of arena handing out 8-byte elements
pub type HarnessAllocator = SentinelAllocator<f64, 1000>;

/// Apply all requests of a test case to a fresh allocator and return its final state.
///
/// Requests that cannot be satisfied are logged and skipped; they never abort the test case.
pub fn run_case(case: &TestCase) -> Result<HarnessAllocator, HarnessError> {
    let mut allocator = HarnessAllocator::new().map_err(|e| HarnessError::Setup {
        reason: e.to_string(),
    })?;
    // live allocations, kept sorted by address
    let mut live: Vec<(PayloadPtr<f64>, usize)> = Vec::new();

    for request in &case.requests {
        match *request {
            Request::Allocate(count) => match allocator.allocate(count) {
                Ok(ptr) => {
                    let pos = live.partition_point(|(live_ptr, _)| *live_ptr < ptr);
                    live.insert(pos, (ptr, count));
                }
                Err(e) => log::warn!("allocation of {} elements failed: {}", count, e),
            },
            Request::Deallocate(index) => {
                let Some(&(ptr, count)) = live.get(index) else {
                    log::warn!(
                        "cannot free block {}; only {} blocks are allocated",
                        index + 1,
                        live.len()
                    );
                    continue;
                };
                match allocator.deallocate(ptr, count) {
                    Ok(()) => {
                        live.remove(index);
                    }
                    Err(e) => log::warn!("deallocation of block {} failed: {}", index + 1, e),
                }
            }
        }
    }

    log::debug!("final state: {:#?}", allocator);
    Ok(allocator)
}

/// Render the header sentinels of all blocks in address order, separated by spaces.
pub fn render(allocator: &HarnessAllocator) -> String {
    allocator
        .blocks()
        .map(|block| block.size().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run a whole script and write one line of sentinels per test case to `out`.
pub fn run(script: &str, out: &mut impl Write) -> Result<(), HarnessError> {
    let cases = parse_script(script)?;
    for (i, case) in cases.iter().enumerate() {
        log::info!(
            "running test case {} with {} requests",
            i + 1,
            case.requests.len()
        );
        let allocator = run_case(case)?;
        writeln!(out, "{}", render(&allocator)).map_err(|e| HarnessError::Write {
            reason: e.to_string(),
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn run_to_string(script: &str) -> String {
        let mut out = Vec::new();
        run(script, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_untouched_allocator() {
        assert_eq!(run_to_string("1\n\n"), "992\n");
    }

    #[test]
    fn test_allocate_and_free() {
        assert_eq!(run_to_string("1\n\n2\n"), "-16 968\n");
        assert_eq!(run_to_string("1\n\n2\n-1\n"), "992\n");
    }

    #[test]
    fn test_frees_address_ordered_block() {
        // the one-element block lands in the hole at the front, so it is block 1 in address order
        let script = "1\n\n3\n2\n-1\n1\n-1\n";
        assert_eq!(run_to_string(script), "24 -16 936\n");
    }

    #[test]
    fn test_multiple_cases_use_fresh_allocators() {
        let script = "2\n\n5\n3\n\n5\n3\n-1\n";
        assert_eq!(run_to_string(script), "-40 -24 912\n40 -24 912\n");
    }

    #[test]
    fn test_failed_requests_are_skipped() {
        // 200 elements never fit, block 5 does not exist
        let script = "1\n\n200\n1\n-5\n";
        assert_eq!(run_to_string(script), "-8 976\n");
    }

    #[test]
    fn test_whole_arena() {
        assert_eq!(run_to_string("1\n\n124\n"), "-992\n");
        assert_eq!(run_to_string("1\n\n124\n1\n"), "-992\n");
    }

    #[test]
    fn test_invalid_script() {
        let mut out = Vec::new();
        assert_eq!(
            run("", &mut out),
            Err(HarnessError::MissingCaseCount)
        );
        assert!(out.is_empty());
    }
}
