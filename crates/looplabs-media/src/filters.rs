//! FFmpeg filter definitions for the loop composite.

use std::path::Path;

/// A centered text layer drawn over the background.
#[derive(Debug, Clone)]
pub struct TextOverlay<'a> {
    /// UTF-8 file holding the overlay text
    pub textfile: &'a Path,
    /// Font family name (fontconfig) or path to a font file
    pub font: &'a str,
    pub font_size: u32,
    /// Color name or `#RRGGBB`
    pub color: &'a str,
}

/// Quote a filter option value so it survives both parsing levels of a
/// filter graph.
///
/// The option parser gets `'value'` with each apostrophe written as `'\''`.
/// The graph parser then needs the quotes and backslashes of that escaped.
pub fn escape_filter_value(value: &str) -> String {
    let quoted = format!("'{}'", value.replace('\'', r"'\''"));
    let mut escaped = String::with_capacity(quoted.len() * 2);
    for c in quoted.chars() {
        if matches!(c, '\\' | '\'' | '[' | ']' | ',' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Whether a font setting names a file rather than a family.
fn is_font_file(font: &str) -> bool {
    let lower = font.to_ascii_lowercase();
    font.contains('/')
        || font.contains('\\')
        || [".ttf", ".otf", ".ttc"].iter().any(|ext| lower.ends_with(ext))
}

/// Translate `Family-Style` names (e.g. `Helvetica-Bold`) to a fontconfig pattern.
pub fn fontconfig_pattern(font: &str) -> String {
    match font.rsplit_once('-') {
        Some((family, style)) if !family.is_empty() && !style.is_empty() => {
            format!("{}:style={}", family, style)
        }
        _ => font.to_string(),
    }
}

/// `font=` or `fontfile=` option for drawtext.
pub fn font_option(font: &str) -> String {
    if is_font_file(font) {
        format!("fontfile={}", escape_filter_value(font))
    } else {
        format!("font={}", escape_filter_value(&fontconfig_pattern(font)))
    }
}

/// Normalize a text color to something FFmpeg's color parser accepts.
///
/// Returns `None` for values that are neither a plain color name nor a hex code.
pub fn ffmpeg_color(value: &str) -> Option<String> {
    let value = value.trim();
    let hex = value
        .strip_prefix('#')
        .or_else(|| value.strip_prefix("0x"))
        .or_else(|| value.strip_prefix("0X"));

    match hex {
        Some(digits) if matches!(digits.len(), 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit()) => {
            Some(format!("0x{}", digits.to_ascii_uppercase()))
        }
        Some(_) => None,
        None if !value.is_empty() && value.chars().all(|c| c.is_ascii_alphabetic()) => {
            Some(value.to_ascii_lowercase())
        }
        None => None,
    }
}

/// Build a drawtext filter centering the overlay text.
pub fn drawtext_filter(overlay: &TextOverlay<'_>) -> String {
    format!(
        "drawtext=textfile={}:expansion=none:{}:fontsize={}:fontcolor={}:x=(w-text_w)/2:y=(h-text_h)/2",
        escape_filter_value(&overlay.textfile.to_string_lossy()),
        font_option(overlay.font),
        overlay.font_size,
        overlay.color,
    )
}

/// Trim, pad, and fade an audio stream to exactly `duration` seconds.
pub fn audio_fade_filter(duration: f64, fade: f64) -> String {
    let fade = fade.min(duration / 2.0).max(0.0);
    let fade_out_start = (duration - fade).max(0.0);
    format!(
        "atrim=0:{d:.3},asetpts=PTS-STARTPTS,apad=whole_dur={d:.3},afade=t=in:st=0:d={f:.3},afade=t=out:st={o:.3}:d={f:.3}",
        d = duration,
        f = fade,
        o = fade_out_start,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_font_option() {
        assert_eq!(font_option("Helvetica-Bold"), r"font=\'Helvetica:style=Bold\'");
        assert_eq!(font_option("Arial"), r"font=\'Arial\'");
        assert_eq!(
            font_option("/usr/share/fonts/DejaVuSans.ttf"),
            r"fontfile=\'/usr/share/fonts/DejaVuSans.ttf\'"
        );
    }

    #[test]
    fn test_ffmpeg_color() {
        assert_eq!(ffmpeg_color("white").as_deref(), Some("white"));
        assert_eq!(ffmpeg_color("#f5d742").as_deref(), Some("0xF5D742"));
        assert_eq!(ffmpeg_color("0xffffff80").as_deref(), Some("0xFFFFFF80"));
        assert!(ffmpeg_color("#fff").is_none());
        assert!(ffmpeg_color("red:evil").is_none());
        assert!(ffmpeg_color("").is_none());
    }

    #[test]
    fn test_drawtext_filter() {
        let textfile = PathBuf::from("/tmp/overlay.txt");
        let filter = drawtext_filter(&TextOverlay {
            textfile: &textfile,
            font: "Times-Bold",
            font_size: 70,
            color: "0xF5D742",
        });
        assert!(filter.starts_with(r"drawtext=textfile=\'/tmp/overlay.txt\':expansion=none"));
        assert!(filter.contains("expansion=none"));
        assert!(filter.contains("fontsize=70"));
        assert!(filter.contains("x=(w-text_w)/2:y=(h-text_h)/2"));
    }

    #[test]
    fn test_audio_fade_filter() {
        let filter = audio_fade_filter(5.0, 0.5);
        assert!(filter.contains("atrim=0:5.000"));
        assert!(filter.contains("apad=whole_dur=5.000"));
        assert!(filter.contains("afade=t=in:st=0:d=0.500"));
        assert!(filter.contains("afade=t=out:st=4.500:d=0.500"));
    }

    #[test]
    fn test_escape_filter_value() {
        assert_eq!(escape_filter_value("/tmp/overlay.txt"), r"\'/tmp/overlay.txt\'");
        assert_eq!(escape_filter_value("a:b,c"), r"\'a:b\,c\'");
    }

    #[test]
    fn test_escape_apostrophe_closes_and_reopens_quote() {
        // Option level: 'it'\''s' ; graph level escapes each quote and backslash
        assert_eq!(escape_filter_value("it's"), r"\'it\'\\\'\'s\'");
        assert_eq!(
            font_option("/home/o'neil/fonts/Bold.ttf"),
            r"fontfile=\'/home/o\'\\\'\'neil/fonts/Bold.ttf\'"
        );
    }
}
