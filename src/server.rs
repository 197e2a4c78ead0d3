//! Request loop
//!
//! Reads NDJSON requests from the host, feeds them through [`App`] and
//! writes responses and notifications back. Input reading, schema loads
//! and connection monitoring all run as tasks that post [`AppEvent`]s to
//! one channel, so the app itself is only ever touched from this loop.

use crate::app::{Action, App, AppEvent, spawn_refresh};
use crate::db::QueryProvider;
use crate::error::Result;
use crate::protocol::{Message, parse_request};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Serve requests from `input` until it closes or the host sends `/quit`
///
/// When `provider` is set the schema is loaded once at startup, then again
/// on every `/refresh`. `conn_err_rx` carries background connection
/// failures from the driver.
pub async fn serve<P, R, W>(
    mut app: App,
    provider: Option<Arc<P>>,
    conn_err_rx: Option<mpsc::UnboundedReceiver<String>>,
    input: R,
    output: &mut W,
) -> Result<()>
where
    P: QueryProvider + 'static,
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin,
{
    let (tx, mut rx) = mpsc::unbounded_channel();

    spawn_reader(input, tx.clone());

    if let Some(mut conn_err_rx) = conn_err_rx {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(msg) = conn_err_rx.recv().await {
                let _ = tx.send(AppEvent::ConnectionLost(msg));
            }
        });
    }

    if let Some(provider) = &provider {
        spawn_refresh(Arc::clone(provider), tx.clone());
    }

    // Anything recorded before the loop, such as a failed connect
    if let Some(status) = app.take_status() {
        write_message(output, &Message::notification(status)).await?;
    }

    while let Some(event) = rx.recv().await {
        match app.handle_event(event)? {
            Action::Respond(message) => write_message(output, &message).await?,
            Action::LoadSchema { id } => {
                match &provider {
                    Some(provider) => spawn_refresh(Arc::clone(provider), tx.clone()),
                    None => tracing::warn!("refresh requested without a provider"),
                }
                let reply = Message::Reply {
                    id,
                    message: "Refreshing schema".to_string(),
                };
                write_message(output, &reply).await?;
            }
            Action::Quit | Action::None => {}
        }

        if let Some(status) = app.take_status() {
            write_message(output, &Message::notification(status)).await?;
        }

        if !app.running {
            break;
        }
    }

    tracing::debug!("request loop finished");
    Ok(())
}

fn spawn_reader<R>(input: R, events: mpsc::UnboundedSender<AppEvent>)
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = input.lines();
        loop {
            let event = match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match parse_request(&line) {
                    Ok(request) => AppEvent::Request(request),
                    Err(e) => AppEvent::Malformed(e.to_string()),
                },
                Ok(None) => AppEvent::InputClosed,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read request");
                    AppEvent::InputClosed
                }
            };
            let closed = matches!(event, AppEvent::InputClosed);
            if events.send(event).is_err() || closed {
                break;
            }
        }
    });
}

async fn write_message<W>(output: &mut W, message: &Message) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = message.to_line()?;
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}
