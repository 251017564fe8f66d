//! Line-oriented chat session.
//!
//! Every input line is one message from the configured chat. Replies are
//! written back followed by a blank line. The session ends at EOF or when
//! `shutdown` resolves.

use crate::dispatch::{Dispatcher, Message};
use fintrack::Executor;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

pub async fn run<E, R, W>(
    dispatcher: &Dispatcher<E>,
    chat_id: i64,
    input: R,
    mut output: W,
    shutdown: impl Future<Output = ()>,
) -> anyhow::Result<usize>
where
    E: Executor,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut handled = 0usize;
    tokio::pin!(shutdown);

    loop {
        let line = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("shutdown requested");
                break;
            }
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            tracing::debug!("input closed");
            break;
        };

        let message = Message::new(chat_id, line);
        if let Some(reply) = dispatcher.handle(&message).await {
            output.write_all(reply.as_bytes()).await?;
            output.write_all(b"\n\n").await?;
            output.flush().await?;
            handled += 1;
        }
    }

    Ok(handled)
}
