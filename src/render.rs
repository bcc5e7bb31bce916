use crate::models::GeneratedAdCopy;

/// `0.874` -> `"87%"`, missing -> `"N/A"`.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{}%", (s * 100.0).round() as i64),
        None => "N/A".to_string(),
    }
}

/// Plain-text export of a result set, one numbered block per copy.
pub fn render_results(results: &[GeneratedAdCopy]) -> String {
    let mut out = format!("{} generated ad {}\n", results.len(), if results.len() == 1 { "copy" } else { "copies" });

    for (i, copy) in results.iter().enumerate() {
        out.push_str(&format!("\nAd copy {}\n", i + 1));
        if let Some(headline) = &copy.headline {
            out.push_str(&format!("  Headline: {}\n", headline));
        }
        out.push_str(&format!("  Copy: {}\n", copy.copy_text));
        if let Some(cta) = &copy.call_to_action {
            out.push_str(&format!("  Call to action: {}\n", cta));
        }
        if let Some(eval) = &copy.evaluation {
            out.push_str(&format!("  Relevance: {}\n", format_score(eval.relevance_score)));
            out.push_str(&format!("  Creativity: {}\n", format_score(eval.creativity_score)));
            if let Some(appeal) = &eval.target_audience_appeal {
                out.push_str(&format!("  Audience appeal: {}\n", appeal));
            }
        }
    }
    out
}
