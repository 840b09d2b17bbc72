//! Non-blocking UDP connection to the game server.
//!
//! macroquad owns the main loop, so networking cannot block: the socket is
//! switched to non-blocking mode and drained once per frame. Heartbeats go
//! out on a timer from the same poll call so the server's timeout sweep
//! never reaps a live but idle client.

use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::Packet;
use std::io::ErrorKind;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

// Get current timestamp in milliseconds
fn get_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

pub struct Connection {
    socket: UdpSocket,
    server_addr: SocketAddr,
    pub client_id: Option<u32>,
    last_heartbeat: Instant,
}

impl Connection {
    /// Binds an ephemeral local socket and sends the connect handshake.
    /// The `Connected` reply arrives through a later `poll`.
    pub fn connect(server_addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let server_addr = server_addr
            .to_socket_addrs()?
            .next()
            .ok_or("could not resolve server address")?;

        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;

        let connection = Self {
            socket,
            server_addr,
            client_id: None,
            last_heartbeat: Instant::now(),
        };

        info!("Connecting to server at {}", server_addr);
        connection.send(&Packet::Connect { client_version: 1 });

        Ok(connection)
    }

    pub fn is_connected(&self) -> bool {
        self.client_id.is_some()
    }

    /// Fire-and-forget send; failures are logged, matching the transport's
    /// best-effort semantics.
    pub fn send(&self, packet: &Packet) {
        match serialize(packet) {
            Ok(data) => {
                if let Err(e) = self.socket.send_to(&data, self.server_addr) {
                    error!("Failed to send packet: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize packet: {}", e),
        }
    }

    /// Drains every pending datagram and returns the decoded packets in
    /// arrival order. Also emits the periodic heartbeat.
    pub fn poll(&mut self) -> Vec<Packet> {
        if self.last_heartbeat.elapsed() >= HEARTBEAT_INTERVAL {
            if self.is_connected() {
                self.send(&Packet::Heartbeat {
                    timestamp: get_timestamp(),
                });
            } else {
                // The connect datagram may have been lost; try again.
                self.send(&Packet::Connect { client_version: 1 });
            }
            self.last_heartbeat = Instant::now();
        }

        let mut packets = Vec::new();
        // A full board snapshot is ~2KB on the wire; leave headroom.
        let mut buffer = [0u8; 4096];

        loop {
            match self.socket.recv_from(&mut buffer) {
                Ok((len, from)) => {
                    if from != self.server_addr {
                        continue;
                    }

                    match deserialize::<Packet>(&buffer[0..len]) {
                        Ok(packet) => {
                            self.track_connection_state(&packet);
                            packets.push(packet);
                        }
                        Err(e) => warn!("Failed to deserialize packet: {}", e),
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) => {
                    error!("Error receiving packet: {}", e);
                    break;
                }
            }
        }

        packets
    }

    fn track_connection_state(&mut self, packet: &Packet) {
        match packet {
            Packet::Connected { client_id } => {
                info!("Connected! Client ID: {}", client_id);
                self.client_id = Some(*client_id);
            }
            Packet::Disconnected { reason } => {
                warn!("Disconnected by server: {}", reason);
                self.client_id = None;
            }
            _ => {}
        }
    }

    /// Tells the server we are leaving. Best effort; the server's timeout
    /// sweep covers the case where this datagram is lost.
    pub fn disconnect(&self) {
        self.send(&Packet::Disconnect);
    }
}
