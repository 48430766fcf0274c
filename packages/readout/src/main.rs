mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use cli::{Args, Commands, SourceArgs};
use readout::{
  join_words, logging, CommandSpeech, DisplayRect, JsonRecognizer, LogSpeech, PixmapSurface,
  Point, ReaderConfig, ReaderSession, RecognizeError, RecognizeInput, Recognizer, SpeechEngine,
  TesseractRecognizer,
};

const SPEECH_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() {
  let args = Args::parse();
  logging::init(args.verbose);

  if let Err(e) = run(args).await {
    eprintln!("Error: {:#}", e);
    std::process::exit(1);
  }
}

async fn run(args: Args) -> Result<()> {
  match args.command {
    Commands::Version => {
      println!("readout {}", env!("CARGO_PKG_VERSION"));
      Ok(())
    }
    Commands::Select {
      source,
      from,
      to,
      tolerance,
      rate,
      volume,
      overlay,
      speak,
      speech_command,
      speech_args,
    } => {
      let mut config = load_config(&source)?;
      if let Some(tolerance) = tolerance {
        config.tolerance = tolerance;
      }
      if let Some(rate) = rate {
        config.speech.rate = rate;
      }
      if let Some(volume) = volume {
        config.speech.volume = volume;
      }
      let request = SelectRequest {
        from,
        to,
        overlay,
      };
      if speak {
        let engine = CommandSpeech::new(speech_command).with_args(speech_args);
        select(engine, config, &source, request, true).await
      } else {
        select(LogSpeech::new(), config, &source, request, false).await
      }
    }
    Commands::Words { source } => {
      let config = load_config(&source)?;
      list_words(config, &source).await
    }
  }
}

struct SelectRequest {
  from: Point,
  to: Point,
  overlay: Option<std::path::PathBuf>,
}

async fn select<E: SpeechEngine>(
  engine: E,
  config: ReaderConfig,
  source: &SourceArgs,
  request: SelectRequest,
  wait_for_speech: bool,
) -> Result<()> {
  let mut session = open_session(engine, config, source).await?;

  session.pointer_start(&request.from.into());
  session.pointer_move(&request.to.into());
  let selected = session.pointer_end().unwrap_or_default();
  println!("{}", join_words(&selected));

  if let Some(path) = &request.overlay {
    session
      .canvas()
      .save_png(path)
      .with_context(|| format!("cannot write overlay {}", path.display()))?;
  }

  session.pump();
  if wait_for_speech {
    if !session.engine().is_available() && !selected.is_empty() {
      bail!("speech command is not available");
    }
    while session.playback().is_speaking() {
      tokio::time::sleep(SPEECH_POLL_INTERVAL).await;
      session.pump();
    }
  }
  Ok(())
}

async fn list_words(config: ReaderConfig, source: &SourceArgs) -> Result<()> {
  let session = open_session(LogSpeech::new(), config, source).await?;
  let scale = session
    .surface()
    .scale()
    .ok_or_else(|| anyhow!("image has no scale"))?;
  for word in session.surface().words.words() {
    let rect = DisplayRect::from_word_box(&word.bbox, scale);
    println!(
      "{}\t{},{},{},{}",
      word.text, rect.left, rect.top, rect.right, rect.bottom
    );
  }
  Ok(())
}

/// Loads the image, runs recognition, and returns a session ready for gestures.
async fn open_session<E: SpeechEngine>(
  engine: E,
  config: ReaderConfig,
  source: &SourceArgs,
) -> Result<ReaderSession<E, PixmapSurface>> {
  let mut session = ReaderSession::new(config, engine, PixmapSurface::new());
  session.install_recognizer(recognizer_for(source));

  let display_width = match source.display_width {
    Some(width) => width,
    None => {
      image::image_dimensions(&source.image)
        .with_context(|| format!("cannot read image {}", source.image.display()))?
        .0
    }
  };
  if !session.load_image(RecognizeInput::FilePath(source.image.clone()), display_width) {
    bail!("cannot decode image {}", source.image.display());
  }

  if let Some(job) = session.take_recognition_job() {
    let result = job.run().await;
    match &result {
      // No engine means no words: selections come back empty.
      Err(RecognizeError::Unavailable) => {}
      Err(e) => bail!("recognition failed for {}: {}", source.image.display(), e),
      Ok(_) => {}
    }
    session.complete_recognition(job.generation, result);
  }
  Ok(session)
}

fn recognizer_for(source: &SourceArgs) -> Arc<dyn Recognizer> {
  match &source.words {
    Some(path) if !source.tesseract => Arc::new(JsonRecognizer::from_file(path)),
    _ => Arc::new(TesseractRecognizer::new()),
  }
}

fn load_config(source: &SourceArgs) -> Result<ReaderConfig> {
  let mut config = match &source.config {
    Some(path) => ReaderConfig::load(path)?,
    None => ReaderConfig::default(),
  };
  if let Some(language) = &source.language {
    config.language = language.clone();
  }
  Ok(config)
}
