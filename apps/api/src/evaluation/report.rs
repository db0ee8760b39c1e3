//! Downloadable evaluation summary as a self-contained HTML document.
//!
//! Only producible once all four arms are complete.

use chrono::{DateTime, Utc};

use crate::evaluation::arms::Arm;
use crate::evaluation::progression::{summarize, ArmSummary};
use crate::session::{ResumeRecord, SessionError};

const STYLE: &str = "\
body{font-family:Helvetica,Arial,sans-serif;color:#333;max-width:860px;margin:2rem auto;padding:0 1rem}\
h1{color:#1f77b4;text-align:center}\
table{border-collapse:collapse;width:100%;margin:1rem 0}\
th,td{border:1px solid #ddd;padding:.5rem;text-align:left}\
th{background:#f8f9fa}\
.good{color:#1e7e34}.fair{color:#b8860b}.poor{color:#c0392b}\
.box{background:#f8f9fa;border-left:4px solid #007bff;padding:1rem;margin:.5rem 0}\
.meta{color:#666;font-size:.9rem}";

/// Renders the summary for `resume`, stamped with `generated_at`.
pub fn render_report(
    resume: &ResumeRecord,
    generated_at: DateTime<Utc>,
) -> Result<String, SessionError> {
    let summary = summarize(resume).ok_or(SessionError::NotFullyEvaluated(resume.id))?;
    Ok(render(resume, &summary, generated_at))
}

/// File name offered for the download.
pub fn report_file_name(resume: &ResumeRecord) -> String {
    let slug: String = resume
        .label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        format!("evaluation_summary_resume_{}.html", resume.id)
    } else {
        format!("evaluation_summary_{slug}.html")
    }
}

fn render(resume: &ResumeRecord, summary: &ArmSummary, generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>Evaluation Summary: {}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n",
        escape(&resume.label)
    ));
    html.push_str(&format!("<h1>Evaluation Summary: {}</h1>\n", escape(&resume.label)));

    let source = if resume.file_name.is_empty() {
        "pasted text".to_string()
    } else {
        escape(&resume.file_name)
    };
    html.push_str(&format!(
        "<p class=\"meta\">Source: {source} &middot; Generated {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    html.push_str("<h2>Scores by Arm</h2>\n<table>\n");
    html.push_str("<tr><th>Arm</th><th>Fit Score</th><th>Shortlist</th></tr>\n");
    for arm_score in &summary.scores {
        let shortlisted = resume
            .arm_results
            .get(&arm_score.arm)
            .is_some_and(|r| r.shortlist_recommend());
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{:.1}/5</td><td>{}</td></tr>\n",
            escape(arm_score.arm.title()),
            score_class(arm_score.score),
            arm_score.score,
            if shortlisted { "Recommended" } else { "Not recommended" }
        ));
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Overall</h2>\n<table>\n");
    html.push_str(&format!(
        "<tr><th>Average</th><td class=\"{}\">{:.2}/5</td></tr>\n",
        score_class(summary.average),
        summary.average
    ));
    html.push_str(&format!("<tr><th>Spread</th><td>{:.2}</td></tr>\n", summary.spread));
    html.push_str(&format!(
        "<tr><th>Consistency</th><td>{}</td></tr>\n",
        summary.consistency.label()
    ));
    html.push_str(&format!(
        "<tr><th>Recommendation</th><td><strong>{}</strong></td></tr>\n</table>\n",
        summary.recommendation.label()
    ));

    html.push_str("<h2>Justifications</h2>\n");
    for arm in Arm::ALL {
        if let Some(result) = resume.arm_results.get(&arm) {
            html.push_str(&format!(
                "<div class=\"box\"><strong>{}</strong><p>{}</p></div>\n",
                escape(arm.short_label()),
                escape(result.justification())
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn score_class(score: f64) -> &'static str {
    if score >= 4.0 {
        "good"
    } else if score >= 3.0 {
        "fair"
    } else {
        "poor"
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::evaluation::fallback::fallback_for;
    use crate::evaluation::models::{EvaluationResult, QuickAssessment};
    use crate::evaluation::progression::record_completion;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    fn complete_resume() -> ResumeRecord {
        let mut resume = ResumeRecord::new(2, "Dana <Backend>".to_string());
        resume.file_name = "dana.pdf".to_string();
        record_completion(
            &mut resume,
            Arm::QuickIntuitive,
            EvaluationResult::QuickIntuitive(QuickAssessment {
                fit_score: 4.6,
                shortlist_recommend: true,
                justification: "Deep Rust & Kafka experience".to_string(),
            }),
        );
        for arm in &Arm::ALL[1..] {
            record_completion(&mut resume, *arm, fallback_for(*arm));
        }
        resume
    }

    #[test]
    fn test_report_requires_all_arms() {
        let mut resume = ResumeRecord::new(1, "Resume 1".to_string());
        record_completion(&mut resume, Arm::QuickIntuitive, fallback_for(Arm::QuickIntuitive));
        assert_eq!(
            render_report(&resume, generated_at()),
            Err(SessionError::NotFullyEvaluated(1))
        );
    }

    #[test]
    fn test_report_embeds_scores_and_aggregates() {
        let html = render_report(&complete_resume(), generated_at()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        for arm in Arm::ALL {
            assert!(html.contains(arm.title()), "missing {}", arm.title());
        }
        assert!(html.contains("4.6/5"));
        // (4.6 + 3 + 3 + 3) / 4 = 3.40; spread 1.60
        assert!(html.contains("3.40/5"));
        assert!(html.contains("<td>1.60</td>"));
        assert!(html.contains("Variable"));
        assert!(html.contains("Consider with Reservations"));
        assert!(html.contains("2026-03-01 09:30 UTC"));
    }

    #[test]
    fn test_report_escapes_user_text() {
        let html = render_report(&complete_resume(), generated_at()).unwrap();
        assert!(html.contains("Dana &lt;Backend&gt;"));
        assert!(html.contains("Rust &amp; Kafka"));
        assert!(!html.contains("<Backend>"));
    }

    #[test]
    fn test_report_is_self_contained() {
        let html = render_report(&complete_resume(), generated_at()).unwrap();
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
        assert!(html.contains("<style>"));
    }

    #[test]
    fn test_report_file_name_slug() {
        let resume = complete_resume();
        assert_eq!(report_file_name(&resume), "evaluation_summary_dana__backend.html");
        let unnamed = ResumeRecord::new(7, "***".to_string());
        assert_eq!(report_file_name(&unnamed), "evaluation_summary_resume_7.html");
    }
}
