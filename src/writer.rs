use bytes::{Bytes, BytesMut};
use compression_codecs::EncodeV2;
use compression_core::util::{PartialBuffer, WriteBuffer};
use std::fmt;
use std::io;

const OUTPUT_BUFFER_SIZE: usize = 8 * 1024; // 8KB output buffer

/// A writer that compresses everything written to it into an in-memory sink.
///
/// Encoders hold data back internally, so the sink is only complete once the
/// writer has been [finished](CompressingWriter::finish). Finishing consumes
/// the writer; dropping it unfinished discards the encoder and the partial
/// output.
pub struct CompressingWriter {
    encoder: Box<dyn EncodeV2 + Send>,
    sink: BytesMut,
    output_buffer: Vec<u8>,
}

impl CompressingWriter {
    /// Creates a writer that feeds `encoder` and appends its output to `sink`.
    pub fn new(encoder: Box<dyn EncodeV2 + Send>, sink: BytesMut) -> Self {
        Self {
            encoder,
            sink,
            output_buffer: vec![0u8; OUTPUT_BUFFER_SIZE],
        }
    }

    /// Finalizes the encoder and returns the complete compressed output.
    pub fn finish(mut self) -> io::Result<Bytes> {
        loop {
            let mut output = WriteBuffer::new_initialized(self.output_buffer.as_mut_slice());
            let done = self.encoder.finish(&mut output)?;

            let written = output.written_len();
            self.sink.extend_from_slice(&self.output_buffer[..written]);

            if done {
                break;
            }
        }

        Ok(self.sink.freeze())
    }
}

impl io::Write for CompressingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut input = PartialBuffer::new(buf);

        // Keep encoding until all input is consumed
        loop {
            let consumed = input.written_len();
            let mut output = WriteBuffer::new_initialized(self.output_buffer.as_mut_slice());
            self.encoder.encode(&mut input, &mut output)?;

            let written = output.written_len();
            self.sink.extend_from_slice(&self.output_buffer[..written]);

            if input.written_len() >= buf.len() {
                break;
            }

            // The encoder made no progress; report what was taken.
            if written == 0 && input.written_len() == consumed {
                break;
            }
        }

        Ok(input.written_len())
    }

    fn flush(&mut self) -> io::Result<()> {
        loop {
            let mut output = WriteBuffer::new_initialized(self.output_buffer.as_mut_slice());
            let done = self.encoder.flush(&mut output)?;

            let written = output.written_len();
            self.sink.extend_from_slice(&self.output_buffer[..written]);

            if done {
                return Ok(());
            }
        }
    }
}

impl fmt::Debug for CompressingWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressingWriter")
            .field("compressed_len", &self.sink.len())
            .finish_non_exhaustive()
    }
}
