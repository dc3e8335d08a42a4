use std::io::Write;
use std::time::Instant;

use tracing::{debug, info, warn};

use iongen_core::TypeDefinition;

use crate::context::GenContext;
use crate::errors::GenerationError;
use crate::generator::generate;
use crate::model::{GenerateOptions, GenerationReport};
use crate::output::{CountingWriter, Encoder, encoder_for};

/// Size-targeting emission loop. Two phases: a sampling phase that flushes
/// after every value until 5% of the target is reached, then a replication
/// phase that emits the sampled batch size per flush until the target is
/// crossed. The final batch is never trimmed, so overshoot is bounded by
/// roughly one batch.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run<W: Write>(
        &self,
        definition: &TypeDefinition,
        sink: W,
    ) -> Result<GenerationReport, GenerationError> {
        let start = Instant::now();
        let encoder = encoder_for(self.options.format);
        let mut writer = CountingWriter::new(sink);
        let mut ctx = GenContext::with_max_depth(self.options.seed, self.options.max_depth);

        info!(
            target_bytes = self.options.target_bytes,
            seed = self.options.seed,
            "generation started"
        );

        let outcome = self.drive(definition, encoder, &mut writer, &mut ctx);

        match outcome {
            Ok((values_emitted, batch_size)) => {
                writer.flush()?;
                let report = GenerationReport {
                    target_bytes: self.options.target_bytes,
                    bytes_written: writer.count(),
                    values_emitted,
                    batch_size,
                    duration_ms: start.elapsed().as_millis() as u64,
                };
                info!(
                    bytes_written = report.bytes_written,
                    values_emitted = report.values_emitted,
                    batch_size = report.batch_size,
                    duration_ms = report.duration_ms,
                    "generation completed"
                );
                Ok(report)
            }
            Err(err) => {
                // Partial output is still flushed before the failure is
                // surfaced; the sink closes when it goes out of scope.
                let _ = writer.flush();
                warn!(error = %err, "generation failed");
                Err(err)
            }
        }
    }

    fn drive<W: Write>(
        &self,
        definition: &TypeDefinition,
        encoder: &dyn Encoder,
        writer: &mut CountingWriter<W>,
        ctx: &mut GenContext,
    ) -> Result<(u64, u64), GenerationError> {
        let target = self.options.target_bytes;
        let threshold = target / 20;
        let mut values_emitted = 0_u64;

        // Sampling phase: measure after every value until the per-value
        // size estimate is worth amortizing.
        let mut batch_size = 0_u64;
        loop {
            let element = generate(definition, ctx)?;
            encoder.encode(&element, writer)?;
            writer.flush()?;
            values_emitted += 1;
            batch_size += 1;
            if writer.count() > threshold {
                break;
            }
        }
        debug!(
            batch_size,
            bytes_written = writer.count(),
            "sampling phase complete"
        );

        // Replication phase: each value is freshly generated, never a
        // replay of an earlier one.
        while writer.count() < target {
            for _ in 0..batch_size {
                let element = generate(definition, ctx)?;
                encoder.encode(&element, writer)?;
                values_emitted += 1;
            }
            writer.flush()?;
        }

        Ok((values_emitted, batch_size))
    }
}
