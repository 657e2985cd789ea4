use anyhow::{Result, bail};
use mailprobe_lib::{BatchSummary, MxStatus, VerificationResult};

pub fn write_summary(results: &[VerificationResult], format: &str) -> Result<()> {
    let summary = BatchSummary::from_results(results);
    match format {
        "human" => {
            println!();
            println!("Summary: {summary}");
            Ok(())
        }
        "json" => write_json(results, &summary),
        other => bail!("unknown --format '{other}', use: human|json"),
    }
}

#[cfg(feature = "with-serde")]
fn write_json(results: &[VerificationResult], summary: &BatchSummary) -> Result<()> {
    #[derive(serde::Serialize)]
    struct Payload<'a> {
        summary: &'a BatchSummary,
        results: &'a [VerificationResult],
    }
    let payload = Payload { summary, results };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[cfg(not(feature = "with-serde"))]
fn write_json(_: &[VerificationResult], _: &BatchSummary) -> Result<()> {
    bail!("format=json nécessite la feature 'with-serde'")
}

pub fn print_verdict(email: &str, is_valid: bool, message: &str) {
    if is_valid {
        println!("[OK]    {email}");
    } else {
        println!("[INVALID] {email} :: {message}");
    }
}

pub fn mx_human_summary(status: &MxStatus) -> String {
    let records = status.records();
    if records.is_empty() {
        return "no MX records".to_string();
    }
    let summary = records
        .iter()
        .map(|r| format!("{}:{}", r.preference, r.exchange))
        .collect::<Vec<_>>()
        .join(", ");
    format!("records: {summary}")
}
