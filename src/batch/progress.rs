use super::VerificationResult;

/// Receives one call per address processed by the batch loop.
pub trait Progress {
    fn on_result(&mut self, index: usize, total: usize, result: &VerificationResult);
}

/// Prints the progress line on stdout.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn on_result(&mut self, index: usize, total: usize, result: &VerificationResult) {
        println!("{}", progress_line(index, total, result));
    }
}

/// Discards progress; the log still gets every line.
#[derive(Debug, Default)]
pub struct SilentProgress;

impl Progress for SilentProgress {
    fn on_result(&mut self, _: usize, _: usize, _: &VerificationResult) {}
}

pub fn progress_line(index: usize, total: usize, result: &VerificationResult) -> String {
    format!(
        "[{index}/{total}] Email: {}, Valid: {}, Message: {}",
        result.input, result.is_valid, result.message
    )
}
