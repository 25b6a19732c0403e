//! `newsdeck generate`: Build a card deck from an article.

use clap::{Args, ValueEnum};
use newsdeck_config::AppConfig;
use newsdeck_core::{ArticleRecord, DeckSize, GenerationOptions, LengthMode, SpeechStyle};
use newsdeck_pipeline::DeckPipeline;
use newsdeck_providers::{ProviderSet, build_from_config};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Article JSON file (`title`, `bodyText`, `sourceUrl`, `imageUrls`, ...), or `-` for stdin
    #[arg(short, long)]
    pub input: PathBuf,

    /// Deck length: 5, 7 or 9 (default from config)
    #[arg(short, long, env = "NEWSDECK_CARD_COUNT")]
    pub cards: Option<u8>,

    /// 0 = informational, 100 = emotional
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub tone: Option<u8>,

    #[arg(long, value_enum, default_value_t = LengthArg::Auto)]
    pub length: LengthArg,

    #[arg(long, value_enum, default_value_t = SpeechArg::Auto)]
    pub speech: SpeechArg,

    /// Ask for explicit keyword emphasis
    #[arg(long)]
    pub emphasize_keywords: bool,

    /// Skip all providers: extractive copy and article images only
    #[arg(long)]
    pub offline: bool,

    /// Write the JSON output here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthArg {
    Auto,
    Short,
    Explanatory,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeechArg {
    Auto,
    Report,
    Cardnews,
}

impl From<LengthArg> for LengthMode {
    fn from(arg: LengthArg) -> Self {
        match arg {
            LengthArg::Auto => LengthMode::Auto,
            LengthArg::Short => LengthMode::Short,
            LengthArg::Explanatory => LengthMode::Explanatory,
        }
    }
}

impl From<SpeechArg> for SpeechStyle {
    fn from(arg: SpeechArg) -> Self {
        match arg {
            SpeechArg::Auto => SpeechStyle::Auto,
            SpeechArg::Report => SpeechStyle::Report,
            SpeechArg::Cardnews => SpeechStyle::CardNews,
        }
    }
}

pub async fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let article = read_article(&args.input)?;
    let options = build_options(&args, &config)?;

    let providers = if args.offline {
        info!("Offline mode: providers disabled");
        ProviderSet::offline()
    } else {
        build_from_config(&config)
    };
    info!(
        text_providers = providers.text_slots().count(),
        image_generation = providers.images.is_some(),
        cards = options.card_count.count(),
        "Generating deck"
    );

    let pipeline = DeckPipeline::from_config(&config, &providers);
    let output = pipeline.run(&article, &options).await;
    let json = serde_json::to_string_pretty(&output)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), cards = output.deck.len(), "Deck written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn read_article(path: &Path) -> Result<ArticleRecord, Box<dyn std::error::Error>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read article at {}: {e}", path.display()))?
    };

    let article: ArticleRecord =
        serde_json::from_str(&content).map_err(|e| format!("Invalid article JSON: {e}"))?;
    Ok(article)
}

fn build_options(args: &GenerateArgs, config: &AppConfig) -> Result<GenerationOptions, Box<dyn std::error::Error>> {
    let card_count = match args.cards {
        Some(n) => DeckSize::try_from(n)?,
        None => config.deck.size(),
    };

    Ok(GenerationOptions {
        tone: args.tone,
        length: args.length.into(),
        speech_style: args.speech.into(),
        keyword_emphasis: args.emphasize_keywords,
        card_count,
    })
}
