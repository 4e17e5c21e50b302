use std::path::PathBuf;

use clap::Parser;
use glimpse_config::Config;
use glimpse_types::Point;

#[derive(Parser, Debug)]
#[command(
    name = "glimpse",
    version,
    about = "Recognize text in an image, or in a region of it dragged out in the preview"
)]
pub struct Args {
    /// Image to load
    #[arg(required_unless_present = "interactive")]
    pub image: Option<PathBuf>,

    /// Recognition language tag passed to the engine (e.g. eng, jpn, eng+deu)
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Drag from x0,y0 to x1,y1 in preview coordinates instead of reading the whole image
    #[arg(short, long, value_parser = parse_drag, value_name = "X0,Y0,X1,Y1")]
    pub select: Option<Drag>,

    /// Preview container size the image is fitted into
    #[arg(long, value_parser = parse_size, value_name = "WxH")]
    pub preview: Option<PreviewSize>,

    /// Profile file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Read commands from stdin
    #[arg(short, long)]
    pub interactive: bool,
}

impl Args {
    /// Flags take precedence over profile and environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(lang) = &self.lang {
            config.ocr.language = lang.clone();
        }
        if let Some(preview) = self.preview {
            config.ui.preview_width = preview.width;
            config.ui.preview_height = preview.height;
        }
        if self.json {
            config.log_json = true;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSize {
    pub width: f64,
    pub height: f64,
}

fn parse_drag(value: &str) -> Result<Drag, String> {
    let coords = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{value}': {e}"))?;

    match coords.as_slice() {
        [x0, y0, x1, y1] => Ok(Drag {
            from: Point::new(*x0, *y0),
            to: Point::new(*x1, *y1),
        }),
        _ => Err(format!("expected four comma separated numbers, got '{value}'")),
    }
}

fn parse_size(value: &str) -> Result<PreviewSize, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{value}'"))?;

    let width: f64 = width.trim().parse().map_err(|e| format!("invalid width: {e}"))?;
    let height: f64 = height.trim().parse().map_err(|e| format!("invalid height: {e}"))?;
    if width <= 0.0 || height <= 0.0 {
        return Err("preview size must be positive".to_string());
    }

    Ok(PreviewSize { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_drag() {
        assert_eq!(
            parse_drag("100,50, 300,200.5"),
            Ok(Drag {
                from: Point::new(100.0, 50.0),
                to: Point::new(300.0, 200.5),
            })
        );
        assert!(parse_drag("1,2,3").is_err());
        assert!(parse_drag("1,2,3,four").is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(
            parse_size("400x300"),
            Ok(PreviewSize {
                width: 400.0,
                height: 300.0
            })
        );
        assert!(parse_size("400").is_err());
        assert!(parse_size("0x300").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from(["glimpse", "scan.png", "--lang", "jpn", "--preview", "640x480"]);
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.ocr.language, "jpn");
        assert_eq!(config.ui.preview_width, 640.0);
        assert_eq!(config.ui.preview_height, 480.0);
        assert!(!config.log_json);
    }

    #[test]
    fn test_image_required_unless_interactive() {
        assert!(Args::try_parse_from(["glimpse"]).is_err());
        assert!(Args::try_parse_from(["glimpse", "--interactive"]).is_ok());
    }
}
