use crate::commands::InputArgs;

use clap::Subcommand;

#[derive(Subcommand)]
pub(crate) enum DetectCommands {
    /// Sentence-level plagiarism against the reference corpus
    Plagiarism {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Perplexity/burstiness based AI detection
    Ai {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Run both engines
    Hybrid {
        #[command(flatten)]
        input: InputArgs,
    },
}
