//! Server network layer handling UDP communications and broadcast fan-out
//!
//! Maps transport events onto engine calls and engine outcomes onto
//! broadcasts. All packets funnel through a single event loop, so session
//! mutations are processed one at a time and every client observes moves
//! in the order the engine accepted them.

use crate::client_manager::ClientManager;
use crate::game::{GameSession, MoveOutcome};
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{Mark, Packet};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    ClientTimeout {
        client_id: u32,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the event loop to the network sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket {
        packet: Packet,
        addr: SocketAddr,
    },
    BroadcastPacket {
        packet: Packet,
        exclude: Option<u32>,
    },
}

/// Main server coordinating networking and the game session
pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    session: GameSession,

    // Communication channels
    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        max_clients: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(max_clients))),
            session: GameSession::new(),
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    /// The address the socket actually bound to. Needed by callers that
    /// bind to port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Spawns task that continuously listens for incoming packets
    async fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            // A full board snapshot is ~2KB on the wire; leave headroom.
            let mut buffer = [0u8; 4096];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        } else {
                            warn!("Failed to deserialize packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that processes the outgoing packet queue. Broadcasts
    /// drain in submission order, which preserves the order moves were
    /// accepted in for every client.
    async fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let client_addrs = {
                            let clients_guard = clients.read().await;
                            clients_guard.get_client_addrs()
                        };

                        for (client_id, addr) in client_addrs {
                            if Some(client_id) == exclude {
                                continue;
                            }

                            if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that monitors client timeouts
    async fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = {
                    let mut clients_guard = clients.write().await;
                    clients_guard.check_timeouts()
                };

                for client_id in timed_out {
                    if let Err(e) = server_tx.send(ServerMessage::ClientTimeout { client_id }) {
                        error!("Failed to send timeout message: {}", e);
                        break;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    async fn send_packet(&self, packet: &Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket {
            packet: packet.clone(),
            addr,
        }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    async fn broadcast_packet(&self, packet: &Packet, exclude: Option<u32>) {
        if let Err(e) = self.game_tx.send(GameMessage::BroadcastPacket {
            packet: packet.clone(),
            exclude,
        }) {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    /// Resolves the sender of a datagram to a registered client and
    /// refreshes their liveness. Packets from unknown addresses carry no
    /// authority and are dropped by the callers.
    async fn registered_sender(&self, addr: SocketAddr) -> Option<u32> {
        let client_id = {
            let clients = self.clients.read().await;
            clients.find_client_by_addr(addr)
        };

        if let Some(client_id) = client_id {
            let mut clients = self.clients.write().await;
            clients.touch(client_id);
        }

        client_id
    }

    /// Processes one incoming packet against the registry and the session
    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                info!(
                    "Client connecting from {} (version: {})",
                    addr, client_version
                );
                self.handle_connect(addr).await;
            }

            Packet::MakeMove { index, player } => {
                let Some(client_id) = self.registered_sender(addr).await else {
                    warn!("Move attempt from unregistered address {}", addr);
                    return;
                };
                self.handle_move(client_id, index, player).await;
            }

            Packet::RestartGame => {
                let Some(client_id) = self.registered_sender(addr).await else {
                    warn!("Restart request from unregistered address {}", addr);
                    return;
                };
                info!("Game restart requested by client {}", client_id);

                let snapshot = self.session.reset();
                self.broadcast_packet(
                    &Packet::GameReset {
                        board: snapshot.board,
                        current_player: snapshot.current_player,
                        game_active: snapshot.game_active,
                    },
                    None,
                )
                .await;
            }

            Packet::Heartbeat { .. } => {
                // Liveness refresh happens in registered_sender.
                if self.registered_sender(addr).await.is_none() {
                    debug!("Heartbeat from unregistered address {}", addr);
                }
            }

            Packet::Disconnect => {
                let client_id = {
                    let clients = self.clients.read().await;
                    clients.find_client_by_addr(addr)
                };

                if let Some(client_id) = client_id {
                    let mut clients = self.clients.write().await;
                    clients.remove_client(&client_id);
                }
            }

            _ => {
                warn!("Unexpected packet type from client at {}", addr);
            }
        }
    }

    async fn handle_connect(&mut self, addr: SocketAddr) {
        // A re-connect from the same address replaces the old registration.
        let existing_client_id = {
            let clients = self.clients.read().await;
            clients.find_client_by_addr(addr)
        };

        if let Some(existing_id) = existing_client_id {
            info!("Removing existing client {} from {}", existing_id, addr);
            let mut clients = self.clients.write().await;
            clients.remove_client(&existing_id);
        }

        let client_id = {
            let mut clients = self.clients.write().await;
            clients.add_client(addr)
        };

        if let Some(client_id) = client_id {
            self.send_packet(&Packet::Connected { client_id }, addr).await;

            // Only the joining client gets the snapshot.
            let snapshot = self.session.snapshot();
            self.send_packet(
                &Packet::GameState {
                    board: snapshot.board,
                    current_player: snapshot.current_player,
                    game_active: snapshot.game_active,
                },
                addr,
            )
            .await;
        } else {
            let response = Packet::Disconnected {
                reason: "Server full".to_string(),
            };
            self.send_packet(&response, addr).await;
        }
    }

    async fn handle_move(&mut self, client_id: u32, index: u32, player: Mark) {
        match self.session.attempt_move(index as usize, player) {
            MoveOutcome::Rejected => {
                // Silent towards clients: no error event, no broadcast.
                debug!(
                    "Rejected move by {} at cell {} from client {}",
                    player, index, client_id
                );
            }

            MoveOutcome::Accepted => {
                self.broadcast_packet(
                    &Packet::MoveMade {
                        index,
                        player,
                        current_player: self.session.current_player(),
                        game_active: self.session.is_active(),
                    },
                    None,
                )
                .await;
            }

            MoveOutcome::Won {
                winner,
                winning_cells,
            } => {
                self.broadcast_packet(
                    &Packet::MoveMade {
                        index,
                        player,
                        current_player: self.session.current_player(),
                        game_active: self.session.is_active(),
                    },
                    None,
                )
                .await;

                self.broadcast_packet(
                    &Packet::GameOver {
                        winner,
                        winning_cells: winning_cells.iter().map(|&cell| cell as u32).collect(),
                    },
                    None,
                )
                .await;
            }
        }
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        // Initialize concurrent tasks
        self.spawn_network_receiver().await;
        self.spawn_network_sender().await;
        self.spawn_timeout_checker().await;

        let mut stats_interval = interval(Duration::from_secs(30));

        info!("Server started successfully");

        loop {
            tokio::select! {
                // Handle network events
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id }) => {
                            // The registry already dropped the client; the
                            // board is unaffected.
                            info!("Client {} timed out", client_id);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                // Periodic status monitoring
                _ = stats_interval.tick() => {
                    let client_count = {
                        let clients = self.clients.read().await;
                        clients.len()
                    };

                    if client_count > 0 {
                        debug!("{} clients connected, game active: {}, {} to move",
                               client_count, self.session.is_active(), self.session.current_player());
                    }
                },
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::sync::mpsc;

    #[test]
    fn test_server_message_creation() {
        let packet = Packet::Connect { client_version: 1 };
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);

        let msg = ServerMessage::PacketReceived {
            packet: packet.clone(),
            addr,
        };

        match msg {
            ServerMessage::PacketReceived { packet: p, addr: a } => {
                assert_eq!(a, addr);
                match p {
                    Packet::Connect { client_version } => {
                        assert_eq!(client_version, 1);
                    }
                    _ => panic!("Unexpected packet type"),
                }
            }
            _ => panic!("Unexpected message type"),
        }
    }

    #[test]
    fn test_client_timeout_message() {
        let client_id = 42;
        let msg = ServerMessage::ClientTimeout { client_id };

        match msg {
            ServerMessage::ClientTimeout { client_id: id } => {
                assert_eq!(id, client_id);
            }
            _ => panic!("Unexpected message type"),
        }
    }

    #[test]
    fn test_game_message_broadcast() {
        let packet = Packet::GameOver {
            winner: Mark::O,
            winning_cells: vec![10, 30, 50, 70, 90],
        };

        let msg = GameMessage::BroadcastPacket {
            packet: packet.clone(),
            exclude: Some(5),
        };

        match msg {
            GameMessage::BroadcastPacket { packet: p, exclude } => {
                assert_eq!(exclude, Some(5));
                match p {
                    Packet::GameOver { winner, .. } => {
                        assert_eq!(winner, Mark::O);
                    }
                    _ => panic!("Unexpected packet type"),
                }
            }
            _ => panic!("Unexpected message type"),
        }
    }

    #[test]
    fn test_channel_communication() {
        let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

        let packet = Packet::RestartGame;
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);

        let msg = ServerMessage::PacketReceived { packet, addr };
        assert!(tx.send(msg).is_ok());

        let received = rx.try_recv();
        assert!(received.is_ok());

        match received.unwrap() {
            ServerMessage::PacketReceived { packet: p, addr: a } => {
                assert_eq!(a, addr);
                assert!(matches!(p, Packet::RestartGame));
            }
            _ => panic!("Unexpected message type"),
        }
    }

    #[test]
    fn test_address_validation() {
        let valid_addrs = vec![
            "127.0.0.1:3000",
            "0.0.0.0:0",
            "192.168.1.1:9090",
            "[::1]:3000",
        ];

        for addr_str in valid_addrs {
            let result = addr_str.parse::<SocketAddr>();
            assert!(result.is_ok(), "Failed to parse address: {}", addr_str);
        }

        let invalid_addrs = vec!["invalid", "127.0.0.1:99999", "256.256.256.256:8080", ""];

        for addr_str in invalid_addrs {
            let result = addr_str.parse::<SocketAddr>();
            assert!(result.is_err(), "Should fail to parse: {}", addr_str);
        }
    }

    #[tokio::test]
    async fn test_server_binds_ephemeral_port() {
        let server = Server::new("127.0.0.1:0", 4).await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_snapshot_packet_fits_receive_buffer() {
        // Worst case on the wire: every cell occupied.
        let mut board = shared::Board::new();
        for index in 0..shared::CELL_COUNT {
            let mark = if index % 2 == 0 { Mark::X } else { Mark::O };
            board.place(index, mark);
        }

        let packet = Packet::GameState {
            board,
            current_player: Mark::X,
            game_active: true,
        };
        let bytes = serialize(&packet).unwrap();
        assert!(bytes.len() < 4096, "snapshot is {} bytes", bytes.len());
    }
}
