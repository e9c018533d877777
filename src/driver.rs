//! Interactive loop: read a command, run it, print the reply, until the
//! input ends, an error occurs, or the user interrupts.

use crate::{
    errors::{RconError, Result},
    rcon::{FrameReceiver, RconClient},
    socket::Transport,
};
use async_trait::async_trait;
use std::{future::Future, io::BufRead, thread};
use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, Lines},
    sync::mpsc,
};
use tracing::{debug, info};

/// Why the loop stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The command source ran out of input.
    EndOfInput,
    /// The cancellation signal fired.
    Interrupted,
}

/// Yields commands one line at a time.
#[async_trait]
pub trait CommandSource: Send {
    /// Next line, or `None` at end of input.
    async fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Receives the output of each command.
pub trait OutputSink: Send {
    /// Called before waiting for each command.
    fn prompt(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Called with the complete, unaltered reply text.
    fn emit(&mut self, text: &str) -> io::Result<()>;
}

/// [`CommandSource`] over any buffered async reader, e.g. stdin.
#[derive(Debug)]
pub struct LineSource<R> {
    lines: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    /// Read commands line by line from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

#[async_trait]
impl<R> CommandSource for LineSource<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.next_line().await
    }
}

/// [`CommandSource`] fed by a dedicated reader thread.
///
/// Blocking reads such as stdin cannot be cancelled. Keeping them off the
/// runtime means dropping this source, or the runtime, never waits for the
/// next line to arrive.
#[derive(Debug)]
pub struct ThreadSource {
    lines: mpsc::Receiver<io::Result<String>>,
}

impl ThreadSource {
    /// Start a thread reading lines from `reader`. The thread ends at end of
    /// input, on the first error, or once the source is dropped and the next
    /// line has been read.
    pub fn spawn<B>(reader: B) -> io::Result<Self>
    where
        B: BufRead + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(1);

        thread::Builder::new()
            .name("command-reader".to_string())
            .spawn(move || {
                for line in reader.lines() {
                    let failed = line.is_err();
                    if tx.blocking_send(line).is_err() || failed {
                        break;
                    }
                }
            })?;

        Ok(Self { lines: rx })
    }
}

#[async_trait]
impl CommandSource for ThreadSource {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        self.lines.recv().await.transpose()
    }
}

impl OutputSink for Vec<String> {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.push(text.to_owned());
        Ok(())
    }
}

/// Run commands from `source` until it is exhausted, a command fails, or
/// `cancel` completes, whichever comes first.
///
/// When `cancel` wins, an in-flight read or exchange is dropped rather than
/// awaited. The caller is expected to close the session afterwards in every
/// case.
///
/// # Errors
/// Returns the first error from reading input, executing a command, or
/// writing output.
pub async fn run<T, R, S, O, C>(
    client: &mut RconClient<T, R>,
    source: &mut S,
    sink: &mut O,
    cancel: C,
) -> Result<Termination>
where
    T: Transport,
    R: FrameReceiver,
    S: CommandSource,
    O: OutputSink,
    C: Future<Output = ()>,
{
    tokio::select! {
        biased;

        () = cancel => {
            info!("interrupted");
            Ok(Termination::Interrupted)
        }
        res = command_loop(client, source, sink) => res,
    }
}

async fn command_loop<T, R, S, O>(
    client: &mut RconClient<T, R>,
    source: &mut S,
    sink: &mut O,
) -> Result<Termination>
where
    T: Transport,
    R: FrameReceiver,
    S: CommandSource,
    O: OutputSink,
{
    loop {
        sink.prompt().map_err(RconError::Console)?;

        let Some(line) = source.next_line().await.map_err(RconError::Console)? else {
            debug!("end of input");
            return Ok(Termination::EndOfInput);
        };

        let output = client.execute(&line).await?;
        sink.emit(&output).map_err(RconError::Console)?;
    }
}
