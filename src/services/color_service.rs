use std::future::Future;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::api::CoinMarketCapClient;
use crate::models::{Color, ColorError};
use crate::services::enrich_service::ColorSource;

/// Something that turns raw image bytes into a color histogram.
///
/// The output is text with one `count: (channels) #HEX ...` line per color,
/// optionally embedded in a larger report under a `Histogram:` heading.
pub trait HistogramTool {
    fn histogram(&self, image: &[u8]) -> impl Future<Output = Result<String, ColorError>>;
}

/// ImageMagick's `identify -verbose`, fed the image on stdin
#[derive(Debug, Clone)]
pub struct ImageMagick {
    program: String,
}

impl ImageMagick {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl HistogramTool for ImageMagick {
    async fn histogram(&self, image: &[u8]) -> Result<String, ColorError> {
        let mut child = Command::new(&self.program)
            .args(["identify", "-depth", "6", "-verbose", "png:-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ColorError::Tool(format!("Failed to spawn {}: {}", self.program, e)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| ColorError::Tool("stdin not captured".to_string()))?;

        // Feed stdin while draining stdout so a large image cannot deadlock the pipe
        let feed = async move {
            let result = stdin.write_all(image).await;
            drop(stdin);
            result
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|e| ColorError::Tool(e.to_string()))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            return Err(ColorError::Tool(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }
        fed.map_err(|e| ColorError::Tool(format!("Failed to write image: {}", e)))?;

        if !stderr.trim().is_empty() {
            debug!("{} reported: {}", self.program, stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse `count: (...) #HEX` lines.
///
/// When the text contains a `Histogram:` heading only the lines directly
/// below it are read, so colormap tables are never mistaken for counts.
fn parse_histogram(text: &str) -> Vec<(u64, Color)> {
    let mut lines = text.lines();
    let has_heading = text.lines().any(|l| l.trim() == "Histogram:");

    if has_heading {
        for line in lines.by_ref() {
            if line.trim() == "Histogram:" {
                break;
            }
        }
    }

    let mut entries = Vec::new();
    for line in lines {
        match parse_histogram_line(line) {
            Some(entry) => entries.push(entry),
            None if has_heading => break,
            None => continue,
        }
    }
    entries
}

fn parse_histogram_line(line: &str) -> Option<(u64, Color)> {
    let (count, rest) = line.trim().split_once(':')?;
    let count = count.trim().parse::<u64>().ok()?;
    let hex = rest.split_whitespace().find(|token| token.starts_with('#'))?;
    let color = hex.parse::<Color>().ok()?;
    Some((count, color))
}

/// Choose the most frequent color, skipping a pure black or white winner
/// in favour of the runner-up.
pub fn pick_dominant(histogram: &str) -> Result<Color, ColorError> {
    let mut ranked = parse_histogram(histogram);
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    match ranked.as_slice() {
        [] => Err(ColorError::EmptyHistogram),
        [(_, only)] => Ok(*only),
        [(_, first), (_, second), ..] => {
            if first.is_background() {
                Ok(*second)
            } else {
                Ok(*first)
            }
        }
    }
}

/// Dominant color of an image, or [`Color::FALLBACK`] when the tool or its output fails
pub async fn image_color<T: HistogramTool>(tool: &T, id: u64, image: &[u8]) -> Color {
    let result = tool.histogram(image).await;

    result.and_then(|output| pick_dominant(&output)).unwrap_or_else(|e| {
        warn!("Failed to get dominant color for {}: {}", id, e);
        Color::FALLBACK
    })
}

/// Resolves a coin's color from its listing icon
pub struct ColorResolver<T> {
    client: CoinMarketCapClient,
    tool: T,
}

impl<T: HistogramTool> ColorResolver<T> {
    pub fn new(client: CoinMarketCapClient, tool: T) -> Self {
        Self { client, tool }
    }
}

impl<T: HistogramTool> ColorSource for ColorResolver<T> {
    async fn color_for(&self, id: u64) -> Color {
        match self.client.coin_icon(id).await {
            Ok(image) => image_color(&self.tool, id, &image).await,
            Err(e) => {
                warn!("Failed to get icon for {}: {}", id, e);
                Color::FALLBACK
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_http::{closed_base_url, serve_once};
    use reqwest::Client as HttpClient;

    fn resolver_for<T: HistogramTool>(image_base_url: &str, tool: T) -> ColorResolver<T> {
        let client = CoinMarketCapClient::with_base_url(
            HttpClient::new(),
            "key".to_string(),
            format!("{}/v1", image_base_url),
            image_base_url.to_string(),
        );
        ColorResolver::new(client, tool)
    }

    struct CannedTool(Result<&'static str, &'static str>);

    impl HistogramTool for CannedTool {
        async fn histogram(&self, _image: &[u8]) -> Result<String, ColorError> {
            self.0
                .map(str::to_string)
                .map_err(|e| ColorError::Tool(e.to_string()))
        }
    }

    const VERBOSE: &str = "Image:
  Filename: -
  Format: PNG (Portable Network Graphics)
  Geometry: 32x32+0+0
  Colors: 4
  Histogram:
         3: (63,63,63,0) #FFFFFF00 srgba(255,255,255,0)
       600: (0,0,0,63) #000000FF black
       380: (61,36,6,63) #F7931AFF srgba(247,147,26,1)
        41: (20,20,20,63) #505050FF srgba(80,80,80,1)
  Rendering intent: Perceptual
  Colormap entries: 4
  Colormap:
         0: (255,255,255,255) #FFFFFFFF white
";

    #[test]
    fn test_black_winner_falls_back_to_second() {
        let color = pick_dominant(VERBOSE).unwrap();
        assert_eq!(color.to_string(), "#F7931AFF");
    }

    #[test]
    fn test_white_winner_falls_back_to_second() {
        let histogram = "   900: (255,255,255) #FFFFFF white\n   100: (0,128,0) #00800012 green\n";
        assert_eq!(pick_dominant(histogram).unwrap().to_string(), "#008000FF");
    }

    #[test]
    fn test_colored_winner_is_kept_opaque() {
        let histogram = "   10: (1,2,3,4) #0000FF80 blue\n   900: (1,2,3,4) #3C3C3D7F x\n   5: (0,0,0,255) #000000FF black\n";
        assert_eq!(pick_dominant(histogram).unwrap().to_string(), "#3C3C3DFF");
    }

    #[test]
    fn test_single_color_histogram() {
        let histogram = "  1024: (0,0,0,255) #000000FF black\n";
        assert_eq!(pick_dominant(histogram).unwrap(), Color::BLACK);
    }

    #[test]
    fn test_empty_histogram() {
        assert!(matches!(pick_dominant("Image:\n  Histogram:\n"), Err(ColorError::EmptyHistogram)));
    }

    #[tokio::test]
    async fn test_tool_failure_returns_fallback() {
        let color = image_color(&CannedTool(Err("no decode delegate")), 1, b"png").await;
        assert_eq!(color.hex(), "FFFFFFFF");
    }

    #[tokio::test]
    async fn test_unparseable_output_returns_fallback() {
        let color = image_color(&CannedTool(Ok("identify: improper image header")), 1, b"png").await;
        assert_eq!(color.hex(), "FFFFFFFF");
    }

    #[tokio::test]
    async fn test_tool_output_is_used() {
        let color = image_color(&CannedTool(Ok(VERBOSE)), 1, b"png").await;
        assert_eq!(color.hex(), "F7931AFF");
    }

    #[tokio::test]
    async fn test_missing_icon_returns_fallback() {
        let (base_url, request) = serve_once("404 Not Found", "no such icon").await;
        let resolver = resolver_for(&base_url, CannedTool(Ok(VERBOSE)));

        let color = resolver.color_for(42).await;

        assert_eq!(color.hex(), "FFFFFFFF");
        assert!(request.await.unwrap().starts_with("GET /32x32/42.png HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_unreachable_icon_host_returns_fallback() {
        let base_url = closed_base_url().await;
        let resolver = resolver_for(&base_url, CannedTool(Ok(VERBOSE)));

        assert_eq!(resolver.color_for(42).await.hex(), "FFFFFFFF");
    }

    #[tokio::test]
    async fn test_fetched_icon_goes_through_tool() {
        let (base_url, _request) = serve_once("200 OK", "png-bytes").await;
        let resolver = resolver_for(&base_url, CannedTool(Ok(VERBOSE)));

        assert_eq!(resolver.color_for(1).await.to_string(), "#F7931AFF");
    }
}
