//! Plain-text report for the console.

use crate::models::{ChannelReport, SentimentResult};
use crate::utils::format_optional_count;
use std::fmt::Write;

fn sentiment_text(sentiment: Option<&SentimentResult>) -> String {
    sentiment
        .map(|s| format!("{} ({:.2})", s.label, s.score))
        .unwrap_or_else(|| "unavailable".to_string())
}

/// Render a report in the same order the pipeline produced it: channel,
/// latest video, then each comment.
pub fn render_report(report: &ChannelReport) -> String {
    let mut out = String::new();

    match &report.profile {
        Some(profile) => {
            let _ = writeln!(out, "\nChannel Title: {}", profile.title);
            let _ = writeln!(out, "Description: {}", profile.description);
            let _ = writeln!(
                out,
                "Subscribers: {}",
                format_optional_count(profile.subscriber_count)
            );
            let _ = writeln!(
                out,
                "Total Views: {}",
                format_optional_count(profile.view_count)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "\nChannel {}: details unavailable.",
                report.channel_id
            );
        }
    }

    let Some(video) = &report.video else {
        out.push_str("\nNo videos found for this channel.\n");
        return out;
    };

    let _ = writeln!(out, "\nLatest Video ID: {}", video.video_id);
    let _ = writeln!(out, "Title: {}", video.title);
    let _ = writeln!(out, "Description: {}", video.description);
    let _ = writeln!(out, "Published At: {}", video.published_at.to_rfc3339());
    let _ = writeln!(
        out,
        "\nSummarized Description: {}",
        video.summarized_description.as_deref().unwrap_or("unavailable")
    );
    let _ = writeln!(
        out,
        "Sentiment Analysis: {}",
        sentiment_text(video.sentiment.as_ref())
    );

    if video.comments.is_empty() {
        out.push_str("\nComments unavailable.\n");
        return out;
    }

    out.push_str("\nTop Comments:\n");
    for comment in &video.comments {
        let _ = writeln!(out, "{}: {}", comment.author, comment.text);
        if comment.is_placeholder() {
            continue;
        }
        let _ = writeln!(
            out,
            "  Summarized Comment: {}",
            comment.summarized_comment.as_deref().unwrap_or("unavailable")
        );
        let _ = writeln!(
            out,
            "  Sentiment Analysis for Comment: {}",
            sentiment_text(comment.sentiment.as_ref())
        );
    }
    out
}
