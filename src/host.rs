//! Line based stand-in for the home automation bridge.
//!
//! Each input line is a request of the form `<encode|decode> <property>
//! <message>`, where the message is the rest of the line. Each request is
//! answered with exactly one line:
//!
//! - `publish <topic> <payload>` for an encoded message,
//! - `update <property> <value>` for a decoded value,
//! - `unchanged <property>` if the payload carried nothing for the property,
//! - `error <description>` if the request could not be handled.

use std::{fmt, str::FromStr};

use color_eyre::Result;
use eyre::eyre;
use log::error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    codec::{Codec, MessageInfo},
    settings::HostSettings,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    pub direction: Direction,
    pub property: String,
    pub message: String,
}

impl FromStr for Request {
    type Err = eyre::Report;

    fn from_str(line: &str) -> Result<Self> {
        let mut parts = line.trim().splitn(3, ' ');

        let direction = match parts.next() {
            Some("encode") => Direction::Encode,
            Some("decode") => Direction::Decode,
            other => {
                return Err(eyre!(
                    "Expected request to start with encode or decode, got {:?}",
                    other.unwrap_or_default()
                ))
            }
        };

        let property = parts
            .next()
            .filter(|property| !property.is_empty())
            .ok_or_else(|| eyre!("Missing property in request {:?}", line))?;

        let message = parts
            .next()
            .ok_or_else(|| eyre!("Missing message in request {:?}", line))?;

        Ok(Request {
            direction,
            property: property.to_string(),
            message: message.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Publish { topic: String, payload: String },
    Update { property: String, value: String },
    Unchanged { property: String },
    Error(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Publish { topic, payload } => write!(f, "publish {} {}", topic, payload),
            Response::Update { property, value } => write!(f, "update {} {}", property, value),
            Response::Unchanged { property } => write!(f, "unchanged {}", property),
            Response::Error(description) => write!(f, "error {}", description),
        }
    }
}

pub fn handle_request(codec: &Codec, settings: &HostSettings, request: Request) -> Result<Response> {
    match request.direction {
        Direction::Encode => {
            let topic = settings.set_topic.replace("{name}", codec.name());
            let info = MessageInfo::new(topic.clone(), request.property);
            let payload = codec.encode(&request.message, &info)?;

            Ok(Response::Publish { topic, payload })
        }
        Direction::Decode => {
            let topic = settings.state_topic.replace("{name}", codec.name());
            let info = MessageInfo::new(topic, request.property);

            match codec.decode(&request.message, &info)? {
                Some(value) => Ok(Response::Update {
                    property: info.property,
                    value,
                }),
                None => Ok(Response::Unchanged {
                    property: info.property,
                }),
            }
        }
    }
}

/// Answers requests from `reader` on `writer` until end of input. A failing
/// request is reported and does not stop processing.
pub async fn run_line_loop<R, W>(
    codec: &Codec,
    settings: &HostSettings,
    reader: R,
    mut writer: W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let result = line
            .parse::<Request>()
            .and_then(|request| handle_request(codec, settings, request));

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("Error while handling request {:?}: {:?}", line, e);
                Response::Error(format!("{:#}", e))
            }
        };

        writer.write_all(format!("{}\n", response).as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}
