//! Server-side HTML for the Launchpad page.
//!
//! Third-party text (headline, symbols) is always escaped before it lands
//! in markup.

use crate::application::snippets::Snippets;
use crate::application::TickerView;
use crate::domain::{Direction, Headline, Quote};
use std::fmt::Write;
use url::Url;

const STYLESHEET: &str = include_str!("../../assets/launchpad.css");

/// Everything one page render needs.
pub struct PageModel<'a> {
    pub headline: &'a Headline,
    /// Home page of the headline source, linked under the story
    pub source_home: &'a Url,
    pub ticker: &'a TickerView,
    pub snippets: Snippets,
    pub year: i32,
    /// How often the ticker fragment is reloaded, in seconds
    pub refresh_secs: u64,
}

pub fn escape(text: &str) -> String {
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

/// `+2.00%` / `-5.00%`; a zero change reads `+0.00%`.
pub fn format_change(quote: &Quote) -> String {
    // Adding zero turns -0.0 into 0.0.
    let pct = quote.percent_change() + 0.0;
    let sign = match quote.direction() {
        Direction::Up => "+",
        Direction::Down => "",
    };
    format!("{}{:.2}%", sign, pct)
}

pub fn format_price(quote: &Quote) -> String {
    quote
        .price
        .map(|p| format!("{:.2}", p))
        .unwrap_or_else(|| "—".to_string())
}

/// The scrolling marquee; the loop-friendly list is rendered once loaded.
pub fn render_ticker(view: &TickerView) -> String {
    let mut html = String::from(r#"<div class="scroll">"#);
    if view.loading {
        html.push_str(r#"<span class="muted">Loading quotes…</span>"#);
    } else {
        for quote in view.loop_quotes() {
            let class = match quote.direction() {
                Direction::Up => "price-up",
                Direction::Down => "price-down",
            };
            let _ = write!(
                html,
                r#"<span class="row"><strong>{}</strong>&nbsp;<span class="{}">{} ({})</span><span class="dot">•</span></span>"#,
                escape(&quote.symbol),
                class,
                format_price(&quote),
                format_change(&quote),
            );
        }
    }
    html.push_str("</div>");
    html
}

fn render_news(headline: &Headline, source_home: &Url) -> String {
    let summary = headline
        .summary
        .as_deref()
        .map(|s| format!(r#"<p class="desc">{}</p>"#, escape(s)))
        .unwrap_or_default();
    format!(
        r#"<article class="card news">
  <div class="section-title">Tech News (TLDR)</div>
  <h2 class="headline"><a href="{url}" target="_blank" rel="noreferrer">{title}</a></h2>
  {summary}
  <p class="muted small">Source: <a href="{home}" target="_blank" rel="noreferrer">{host}</a> <span class="chip">{source}</span></p>
</article>"#,
        url = escape(&headline.url),
        home = escape(source_home.as_str()),
        host = escape(source_home.host_str().unwrap_or(source_home.as_str())),
        title = escape(&headline.title),
        summary = summary,
        source = headline.source.as_str(),
    )
}

fn render_snippets(snippets: &Snippets) -> String {
    let nugget = snippets.nugget;
    let code = nugget
        .code
        .map(|c| format!(r#"<pre aria-label="example"><code>{}</code></pre>"#, escape(c)))
        .unwrap_or_default();
    let fact = snippets.fact;
    format!(
        r#"<article class="card nugget">
  <div class="section-title">Knowledge Nugget — {topic}</div>
  <h3 class="headline">{n_title}</h3>
  <p class="desc">{n_body} <a href="{n_link}" target="_blank" rel="noreferrer">{n_label}</a></p>
  {code}
</article>
<article class="card history">
  <div class="section-title">Today I Learned — History</div>
  <h3 class="headline">{f_title}</h3>
  <p class="desc">{f_body} <a href="{f_link}" target="_blank" rel="noreferrer">Learn more →</a></p>
</article>"#,
        topic = escape(nugget.topic),
        n_title = escape(nugget.title),
        n_body = escape(nugget.body),
        n_link = escape(nugget.link),
        n_label = escape(nugget.link_label),
        code = code,
        f_title = escape(fact.title),
        f_body = escape(fact.body),
        f_link = escape(fact.link),
    )
}

pub fn render_page(model: &PageModel<'_>) -> String {
    let refresh_ms = model.refresh_secs.saturating_mul(1000);
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Software Vocation — Launchpad</title>
<style>{css}</style>
</head>
<body>
<main class="wrap">
<header class="header">
  <div class="brand">
    <div class="logo" aria-hidden="true"></div>
    <div>
      <h1>Software Vocation — Launchpad</h1>
      <div class="tag">A daily starting point for budding engineers</div>
    </div>
  </div>
  <div class="pill">v1</div>
</header>
<section class="grid">
{news}
<aside class="card ticker">
  <div class="section-title">Market Ticker</div>
  <div class="ticker-track" id="ticker" role="marquee" aria-label="Live stock prices scrolling">{ticker}</div>
  <p class="muted small">Demo data from FinancialModelingPrep (refreshes every minute).</p>
</aside>
{snippets}
</section>
<footer><span class="muted">© {year} Software Vocation. Data belongs to respective sources.</span></footer>
</main>
<script>
setInterval(async () => {{
  try {{
    const res = await fetch("/fragments/ticker");
    if (res.ok) document.getElementById("ticker").innerHTML = await res.text();
  }} catch (_) {{}}
}}, {refresh_ms});
</script>
</body>
</html>
"#,
        css = STYLESHEET,
        news = render_news(model.headline, model.source_home),
        ticker = render_ticker(model.ticker),
        snippets = render_snippets(&model.snippets),
        year = model.year,
        refresh_ms = refresh_ms,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::snippets::{FACTS, NUGGETS};
    use crate::domain::HeadlineSource;

    fn loaded(quotes: Vec<Quote>) -> TickerView {
        TickerView {
            quotes,
            loading: false,
            updated_at: None,
        }
    }

    fn quote(symbol: &str, price: Option<f64>, change: Option<f64>, pct: Option<f64>) -> Quote {
        Quote {
            symbol: symbol.into(),
            price,
            change,
            changes_percentage: pct,
        }
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn change_formatting_matches_direction() {
        assert_eq!(format_change(&quote("A", Some(150.0), Some(3.0), Some(2.0))), "+2.00%");
        assert_eq!(format_change(&quote("B", Some(100.0), Some(-5.0), None)), "-5.00%");
        assert_eq!(format_change(&quote("C", None, None, None)), "+0.00%");
        assert_eq!(format_change(&quote("D", Some(10.0), Some(-0.0), None)), "+0.00%");
    }

    #[test]
    fn missing_price_renders_dash() {
        assert_eq!(format_price(&quote("A", None, None, None)), "—");
        assert_eq!(format_price(&quote("A", Some(1.5), None, None)), "1.50");
    }

    #[test]
    fn ticker_shows_loading_placeholder() {
        let html = render_ticker(&TickerView {
            quotes: Vec::new(),
            loading: true,
            updated_at: None,
        });
        assert!(html.contains("Loading quotes…"));
    }

    #[test]
    fn ticker_renders_each_quote_twice() {
        let html = render_ticker(&loaded(vec![
            quote("AAPL", Some(150.0), Some(3.0), Some(2.0)),
            quote("MSFT", Some(100.0), Some(-5.0), None),
        ]));
        assert_eq!(html.matches("<strong>AAPL</strong>").count(), 2);
        assert_eq!(html.matches(r#"class="price-down""#).count(), 2);
        assert!(html.contains("150.00 (+2.00%)"));
        assert!(!html.contains("Loading"));
    }

    #[test]
    fn empty_loaded_ticker_has_no_rows() {
        let html = render_ticker(&loaded(Vec::new()));
        assert!(!html.contains("row"));
        assert!(!html.contains("Loading"));
    }

    #[test]
    fn page_escapes_headline_and_shows_source() {
        let headline = Headline {
            title: "<script>alert(1)</script>".into(),
            url: "https://tldr.tech/\"x".into(),
            summary: Some("Short & sweet".into()),
            source: HeadlineSource::Feed,
        };
        let ticker = loaded(Vec::new());
        let home = Url::parse("https://tldr.tech/").unwrap();
        let html = render_page(&PageModel {
            headline: &headline,
            source_home: &home,
            ticker: &ticker,
            snippets: Snippets {
                nugget: &NUGGETS[0],
                fact: &FACTS[0],
            },
            year: 2026,
            refresh_secs: 60,
        });

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("https://tldr.tech/&quot;x"));
        assert!(html.contains("Short &amp; sweet"));
        assert!(html.contains(r#"<span class="chip">feed</span>"#));
        assert!(html.contains("© 2026"));
        assert!(html.contains("60000"));
        assert!(html.contains(r#"Source: <a href="https://tldr.tech/""#));
    }

    #[test]
    fn source_link_follows_configured_origin() {
        let home = Url::parse("https://news.example:8443/").unwrap();
        let headline = Headline::fallback(&home);
        let ticker = loaded(Vec::new());
        let html = render_page(&PageModel {
            headline: &headline,
            source_home: &home,
            ticker: &ticker,
            snippets: Snippets {
                nugget: &NUGGETS[0],
                fact: &FACTS[0],
            },
            year: 2026,
            refresh_secs: 60,
        });

        assert!(html.contains(
            r#"Source: <a href="https://news.example:8443/" target="_blank" rel="noreferrer">news.example</a>"#
        ));
        assert!(!html.contains("https://tldr.tech/"));
    }
}
