use checkem_core::RunReport;

pub fn render(report: &RunReport, format: &str) -> anyhow::Result<String> {
    match format {
        "json" => {
            let files: Vec<serde_json::Value> = report
                .files
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "file": f.file,
                        "errors": f.error_count(),
                        "diagnostics": f.diagnostics,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "board": report.board,
                "files": files,
                "count": report.total(),
            }))?;
            Ok(format!("{json}\n"))
        }
        _ => {
            // Human-readable format
            let mut out: String = report.files.iter().map(|f| f.render()).collect();
            out.push_str(&format!("Count {}\n", report.total()));
            Ok(out)
        }
    }
}
