//! Posts replies to the terminal.

use std::io::{self, Write};
use mawa::commands::{Reply, Responder};

/// A [`Responder`] writing replies to one stream and errors to another.
pub struct Terminal<O: Write, E: Write> {
    out: O,
    err: E
}

impl<O: Write, E: Write> Terminal<O, E> {
    /// Creates a responder over two streams.
    pub fn new(out: O, err: E) -> Self {
        Terminal { out, err }
    }
}

impl<O: Write, E: Write> Responder for Terminal<O, E> {
    type Error = io::Error;

    fn reply(&mut self, reply: Reply) -> Result<(), io::Error> {
        match reply {
            Reply::Edit(text) | Reply::Send(text) => writeln!(self.out, "{text}")?,
            Reply::Embed(embed) => {
                writeln!(self.out, "[{}] {}", embed.color, embed.author)?;
                for line in embed.description.lines() {
                    writeln!(self.out, "  {line}")?;
                }
            }
        }
        self.out.flush()
    }

    fn reply_error(&mut self, title: &str, message: &str) -> Result<(), io::Error> {
        writeln!(self.err, "{title}: {message}")?;
        self.err.flush()
    }
}
