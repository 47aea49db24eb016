//! HTML pages for the web form.
//!
//! Two pages: the URL form (optionally with an error line) and the result
//! page for a [`ChannelReport`]. Every piece of platform or model text is
//! escaped before it is written into the document.

use crate::models::{ChannelProfile, ChannelReport, CommentRecord, SentimentResult, VideoRecord};
use crate::utils::format_optional_count;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

/// Message shown when a URL cannot be resolved to a channel.
pub const INVALID_URL_MESSAGE: &str = "Invalid YouTube URL";

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
.error{color:#b00020}.muted{color:#666}.comment{border-top:1px solid #ddd;padding:.5rem 0}\
input[type=text]{width:70%}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        encode_text(title),
        STYLE,
        body
    )
}

/// The URL form. `error` is shown above the form, `url` refills the field.
pub fn render_index(error: Option<&str>, url: Option<&str>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Channel Pulse</h1>\n");
    body.push_str(
        "<p class=\"muted\">Paste a channel, user, handle or video URL to summarize the channel's latest video.</p>\n",
    );
    if let Some(error) = error {
        let _ = writeln!(body, "<p class=\"error\">{}</p>", encode_text(error));
    }
    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/\">\n\
         <input type=\"text\" name=\"url\" placeholder=\"https://www.youtube.com/@handle\" value=\"{}\" required>\n\
         <button type=\"submit\">Analyze</button>\n</form>",
        encode_double_quoted_attribute(url.unwrap_or_default())
    );
    page("Channel Pulse", &body)
}

/// The result page for a resolved channel.
pub fn render_report(report: &ChannelReport) -> String {
    let mut body = String::new();
    let title = report
        .profile
        .as_ref()
        .map(|p| p.title.as_str())
        .unwrap_or(report.channel_id.as_str());

    match &report.profile {
        Some(profile) => write_profile(&mut body, profile),
        None => {
            let _ = writeln!(
                body,
                "<h1>{}</h1>\n<p class=\"muted\">Channel details unavailable.</p>",
                encode_text(report.channel_id.as_str())
            );
        }
    }

    match &report.video {
        Some(video) => write_video(&mut body, video),
        None => body.push_str(
            "<h2>Latest video</h2>\n<p class=\"muted\">No videos found for this channel.</p>\n",
        ),
    }

    body.push_str("<p><a href=\"/\">Analyze another channel</a></p>\n");
    page(title, &body)
}

fn write_profile(body: &mut String, profile: &ChannelProfile) {
    let _ = writeln!(body, "<h1>{}</h1>", encode_text(&profile.title));
    let _ = writeln!(body, "<p>{}</p>", encode_text(&profile.description));
    let _ = writeln!(
        body,
        "<p><strong>Subscribers:</strong> {} &middot; <strong>Total views:</strong> {}</p>",
        format_optional_count(profile.subscriber_count),
        format_optional_count(profile.view_count)
    );
}

fn write_video(body: &mut String, video: &VideoRecord) {
    let _ = writeln!(
        body,
        "<h2>Latest video: <a href=\"{}\">{}</a></h2>",
        encode_double_quoted_attribute(&video.watch_url()),
        encode_text(&video.title)
    );
    let _ = writeln!(
        body,
        "<p class=\"muted\">Published {}</p>",
        video.published_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(body, "<p>{}</p>", encode_text(&video.description));
    let _ = writeln!(
        body,
        "<p><strong>Summary:</strong> {}</p>",
        summary_html(video.summarized_description.as_deref())
    );
    let _ = writeln!(
        body,
        "<p><strong>Sentiment:</strong> {}</p>",
        sentiment_html(video.sentiment.as_ref())
    );

    body.push_str("<h3>Top comments</h3>\n");
    if video.comments.is_empty() {
        body.push_str("<p class=\"muted\">Comments unavailable.</p>\n");
    }
    for comment in &video.comments {
        write_comment(body, comment);
    }
}

fn write_comment(body: &mut String, comment: &CommentRecord) {
    body.push_str("<div class=\"comment\">\n");
    let _ = writeln!(
        body,
        "<p><strong>{}</strong>: {}</p>",
        encode_text(&comment.author),
        encode_text(&comment.text)
    );
    if !comment.is_placeholder() {
        let _ = writeln!(
            body,
            "<p class=\"muted\">Summary: {} &middot; Sentiment: {}</p>",
            summary_html(comment.summarized_comment.as_deref()),
            sentiment_html(comment.sentiment.as_ref())
        );
    }
    body.push_str("</div>\n");
}

fn summary_html(summary: Option<&str>) -> String {
    match summary {
        Some(summary) => encode_text(summary).into_owned(),
        None => "<em>unavailable</em>".to_string(),
    }
}

fn sentiment_html(sentiment: Option<&SentimentResult>) -> String {
    match sentiment {
        Some(s) => format!("{} ({:.2})", s.label, s.score),
        None => "<em>unavailable</em>".to_string(),
    }
}
