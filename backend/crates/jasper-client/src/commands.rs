use crate::detect_commands::DetectCommands;

use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Where the text to process comes from.
///
/// `--text` wins over `--file`; with neither, stdin is read.
#[derive(Args, Debug, Clone)]
pub(crate) struct InputArgs {
    /// Text to process
    #[arg(long, conflicts_with = "file")]
    pub(crate) text: Option<String>,

    /// Read text from a file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
}

impl InputArgs {
    pub(crate) fn read(&self) -> std::io::Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            return std::fs::read_to_string(path);
        }

        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Check whether the backend is ready
    Health,

    /// Rewrite AI-sounding text in a natural voice
    Humanize {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Summarize text
    Summarize {
        #[command(flatten)]
        input: InputArgs,
        /// Maximum summary length (30-500)
        #[arg(long, default_value_t = 130)]
        max_length: u32,
        /// Minimum summary length (10-200)
        #[arg(long, default_value_t = 30)]
        min_length: u32,
    },

    /// Produce paraphrased variations
    Paraphrase {
        #[command(flatten)]
        input: InputArgs,
        /// Number of variations (1-5)
        #[arg(long, default_value_t = 2)]
        variations: u32,
    },

    /// Check grammar and suggest corrections
    Grammar {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Score text for AI-generated content
    AiDetect {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Check text for common plagiarised phrases
    Plagiarism {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Corpus-backed detection engines
    Detect {
        #[command(subcommand)]
        engine: DetectCommands,
    },

    /// Show reference corpus statistics
    CorpusStats,

    /// Upload a file and print its text
    Upload {
        /// File to upload
        #[arg(long)]
        file: PathBuf,
    },

    /// Extract text from a PDF, DOCX or text file
    Extract {
        /// File to extract text from
        #[arg(long)]
        file: PathBuf,
    },
}
