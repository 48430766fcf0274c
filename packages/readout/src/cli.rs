//! Command line arguments backing the `readout` binary.
use clap::{Args as ClapArgs, Parser, Subcommand};
use readout::Point;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "readout",
  about = "Select words on a scanned image and read them aloud",
  version
)]
pub struct Args {
  /// Log pipeline events to stderr
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,

  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Print version information
  Version,
  /// Replay a drag over the image and speak the words it selects
  Select {
    #[command(flatten)]
    source: SourceArgs,

    /// Drag start in display pixels, as `x,y`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    from: Point,

    /// Drag end in display pixels, as `x,y`
    #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
    to: Point,

    /// Hit-test slack around each word, in display pixels
    #[arg(long)]
    tolerance: Option<f32>,

    /// Speaking rate multiplier
    #[arg(long)]
    rate: Option<f32>,

    /// Speaking volume between 0 and 1
    #[arg(long)]
    volume: Option<f32>,

    /// Write the rendered overlay to this PNG file
    #[arg(long, short = 'o')]
    overlay: Option<PathBuf>,

    /// Speak through the speech command instead of only logging the utterance
    #[arg(long)]
    speak: bool,

    /// espeak-compatible program used with --speak
    #[arg(long, default_value = "espeak")]
    speech_command: PathBuf,

    /// Extra argument passed to the speech program before its own flags (repeatable)
    #[arg(long = "speech-arg", allow_hyphen_values = true)]
    speech_args: Vec<String>,
  },
  /// List recognized words with their display-space rectangles
  Words {
    #[command(flatten)]
    source: SourceArgs,
  },
}

#[derive(ClapArgs, Debug)]
pub struct SourceArgs {
  /// Image to read
  #[arg(long, short = 'i')]
  pub image: PathBuf,

  /// Displayed width in pixels (defaults to the native width)
  #[arg(long, short = 'w')]
  pub display_width: Option<u32>,

  /// Word list recognized ahead of time (JSON)
  #[arg(long, conflicts_with = "tesseract")]
  pub words: Option<PathBuf>,

  /// Recognize with the tesseract command (the default without --words)
  #[arg(long)]
  pub tesseract: bool,

  /// Recognition language
  #[arg(long, short = 'l')]
  pub language: Option<String>,

  /// JSON config file
  #[arg(long, short = 'c')]
  pub config: Option<PathBuf>,
}

fn parse_point(raw: &str) -> Result<Point, String> {
  let (x, y) = raw
    .split_once(',')
    .ok_or_else(|| format!("expected `x,y`, got `{raw}`"))?;
  let x: f32 = x.trim().parse().map_err(|_| format!("bad x coordinate `{x}`"))?;
  let y: f32 = y.trim().parse().map_err(|_| format!("bad y coordinate `{y}`"))?;
  if !x.is_finite() || !y.is_finite() {
    return Err(format!("coordinates must be finite, got `{raw}`"));
  }
  Ok(Point::new(x, y))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_point() {
    assert_eq!(parse_point("15,20.5"), Ok(Point::new(15.0, 20.5)));
    assert_eq!(parse_point(" -3 , 4 "), Ok(Point::new(-3.0, 4.0)));
    assert!(parse_point("15").is_err());
    assert!(parse_point("a,b").is_err());
    assert!(parse_point("inf,1").is_err());
  }
}
