// audit.rs — append-only, per-day record of every classification decision.
//
// Plain text, human-readable, never parsed back in. The file is opened and
// closed per write, so an interrupted sweep leaves at worst one truncated
// record. A failed write must not abort classification of the current
// message: it is logged and swallowed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use crate::classify::ClassificationResult;
use crate::config;
use crate::message::ParsedMessage;

pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    pub fn new(dir: PathBuf) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed creating audit dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Best-effort append. One banner-delimited record per decision.
    pub fn record(&self, msg: &ParsedMessage, result: &ClassificationResult) {
        if let Err(e) = self.append(msg, result) {
            log::warn!("audit write failed, continuing sweep: {e:?}");
        }
    }

    fn append(&self, msg: &ParsedMessage, result: &ClassificationResult) -> anyhow::Result<()> {
        let path = self.day_file();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed opening audit file {}", path.display()))?;

        writeln!(file, "\n\n============<email>============")?;
        writeln!(file, "{}, {} verdict: {}", msg.from, msg.subject, result.verdict.label())?;
        writeln!(file, "============<backend>============")?;
        writeln!(file, "{}", result.backend)?;
        writeln!(file, "============<tokens>============")?;
        writeln!(file, "input: {}, output: {}", result.input_tokens, result.output_tokens)?;
        writeln!(file, "============<response>============")?;
        file.write_all(result.raw_text.as_bytes())?;
        Ok(())
    }

    fn day_file(&self) -> PathBuf {
        let day = chrono::Local::now().format(config::audit::FILE_DATE_FORMAT);
        self.dir.join(format!("{day}{}", config::audit::FILE_SUFFIX))
    }
}
