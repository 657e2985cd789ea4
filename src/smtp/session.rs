use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::info;

use crate::smtp::error::ProbeError;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl SmtpReply {
    pub fn new(code: u16, text: impl Into<String>) -> Self {
        Self {
            code,
            lines: vec![text.into()],
        }
    }

    pub fn is_positive_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    pub fn is_transient_failure(&self) -> bool {
        (400..500).contains(&self.code)
    }

    pub fn is_permanent_failure(&self) -> bool {
        (500..600).contains(&self.code)
    }

    /// Reply text, multi-line replies joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// One parsed reply line: code, continuation flag, text.
pub(crate) fn parse_reply_line(line: &str) -> Result<(u16, bool, String), ProbeError> {
    if line.len() < 3 || !line.is_char_boundary(3) {
        return Err(ProbeError::Protocol(format!("invalid reply: {line}")));
    }
    let code = line[..3]
        .parse::<u16>()
        .map_err(|_| ProbeError::Protocol(format!("invalid code in line: {line}")))?;
    let continuation = line.as_bytes().get(3) == Some(&b'-');
    let text = line.get(4..).unwrap_or_default().to_string();
    Ok((code, continuation, text))
}

#[derive(Debug)]
pub struct SmtpStream {
    host: String,
    stream: TcpStream,
    buffer: Vec<u8>,
}

impl SmtpStream {
    pub fn connect(
        host: &str,
        addr: &SocketAddr,
        timeout: Option<Duration>,
    ) -> Result<Self, ProbeError> {
        let stream = if let Some(timeout) = timeout {
            TcpStream::connect_timeout(addr, timeout)
        } else {
            TcpStream::connect(addr)
        }
        .map_err(|err| ProbeError::connect_failed(host, addr, err))?;
        stream
            .set_read_timeout(timeout)
            .map_err(|err| ProbeError::io(host, err))?;
        stream
            .set_write_timeout(timeout)
            .map_err(|err| ProbeError::io(host, err))?;
        Ok(Self {
            host: host.to_string(),
            stream,
            buffer: Vec::new(),
        })
    }

    pub fn send_command(&mut self, command: &str) -> Result<(), ProbeError> {
        let mut data = command.as_bytes().to_vec();
        data.extend_from_slice(b"\r\n");
        self.stream
            .write_all(&data)
            .and_then(|_| self.stream.flush())
            .map_err(|err| ProbeError::io(&self.host, err))
    }

    pub fn read_reply(&mut self) -> Result<SmtpReply, ProbeError> {
        let mut lines = Vec::new();
        let mut code: Option<u16> = None;
        loop {
            let line = self.read_line()?;
            let (parsed_code, continuation, text) = parse_reply_line(&line)?;
            match code {
                Some(existing) if existing != parsed_code => {
                    return Err(ProbeError::Protocol(format!(
                        "inconsistent reply codes: {existing} vs {parsed_code}"
                    )));
                }
                Some(_) => {}
                None => code = Some(parsed_code),
            }
            lines.push(text);
            if !continuation {
                break;
            }
        }
        Ok(SmtpReply {
            code: code.unwrap_or(0),
            lines,
        })
    }

    fn read_line(&mut self) -> Result<String, ProbeError> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|byte| *byte == b'\n') {
                let mut line = self.buffer.drain(..=pos).collect::<Vec<_>>();
                line.pop();
                if line.last() == Some(&b'\r') {
                    line.pop();
                }
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }

            let mut buf = [0u8; 512];
            let read = self
                .stream
                .read(&mut buf)
                .map_err(|err| ProbeError::io(&self.host, err))?;
            if read == 0 {
                return Err(ProbeError::io(
                    &self.host,
                    io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed"),
                ));
            }
            self.buffer.extend_from_slice(&buf[..read]);
        }
    }
}

/// A single SMTP conversation with one host. Dropping it closes the socket.
pub struct SmtpSession {
    host: String,
    stream: SmtpStream,
    trace: bool,
}

impl SmtpSession {
    pub fn connect(
        host: &str,
        port: u16,
        timeout: Option<Duration>,
        trace: bool,
    ) -> Result<Self, ProbeError> {
        let addresses: Vec<SocketAddr> = (host, port)
            .to_socket_addrs()
            .map_err(|err| ProbeError::connect(host, err.to_string()))?
            .collect();
        if addresses.is_empty() {
            return Err(ProbeError::NoAddress {
                host: host.to_string(),
            });
        }

        let mut last_err = None;
        for addr in &addresses {
            match SmtpStream::connect(host, addr, timeout) {
                Ok(stream) => {
                    return Ok(Self {
                        host: host.to_string(),
                        stream,
                        trace,
                    });
                }
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.unwrap_or_else(|| ProbeError::NoAddress {
            host: host.to_string(),
        }))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn read_banner(&mut self) -> Result<SmtpReply, ProbeError> {
        let reply = self.stream.read_reply()?;
        self.record_reply(&reply);
        Ok(reply)
    }

    pub fn send_command(&mut self, command: &str) -> Result<SmtpReply, ProbeError> {
        self.record("C", command);
        self.stream.send_command(command)?;
        let reply = self.stream.read_reply()?;
        self.record_reply(&reply);
        Ok(reply)
    }

    /// Best effort; the socket is released by `Drop` whatever happens here.
    pub fn quit(&mut self) {
        self.record("C", "QUIT");
        if self.stream.send_command("QUIT").is_ok() {
            if let Ok(reply) = self.stream.read_reply() {
                self.record_reply(&reply);
            }
        }
    }

    fn record(&self, direction: &str, message: &str) {
        if self.trace {
            info!(target: "smtp_trace", "[{}] {direction}: {message}", self.host);
        }
    }

    fn record_reply(&self, reply: &SmtpReply) {
        if !self.trace {
            return;
        }
        if reply.lines.is_empty() {
            self.record("S", &reply.code.to_string());
        } else {
            for line in &reply.lines {
                self.record("S", &format!("{} {}", reply.code, line));
            }
        }
    }
}
