//! Shared fixtures: a local TLS echo server and a stub socket factory.

#![allow(dead_code)]

use std::io::{self, Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rcgen::{CertificateParams, DistinguishedName, DnType, IsCa, Issuer, KeyPair, SanType};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{RootCertStore, ServerConfig, ServerConnection, StreamOwned};
use tlspin_client::connect::server_name;
use tlspin_client::{
    ConnectionParams, Error, Kind, Result, SecureSocketFactory, Socket, SocketFactory,
    TlsSettings, TlsSocket,
};

/// A CA certificate and a server configuration whose leaf it signed.
pub struct TestPki {
    pub ca_der: CertificateDer<'static>,
    pub ca_pem: String,
    pub server_config: Arc<ServerConfig>,
}

impl TestPki {
    pub fn new() -> Self {
        let mut ca_params = CertificateParams::new(Vec::default()).expect("CA params");
        ca_params.is_ca = IsCa::Ca(rcgen::BasicConstraints::Unconstrained);
        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, "tlspin");
        dn.push(DnType::CommonName, "tlspin test CA");
        ca_params.distinguished_name = dn;

        let ca_key = KeyPair::generate().expect("CA key");
        let ca_cert = ca_params.clone().self_signed(&ca_key).expect("CA certificate");
        let issuer = Issuer::new(ca_params, ca_key);

        let mut leaf_params = CertificateParams::new(Vec::default()).expect("leaf params");
        leaf_params.subject_alt_names = vec![
            SanType::DnsName("localhost".try_into().expect("DNS name")),
            SanType::IpAddress(IpAddr::V4(Ipv4Addr::LOCALHOST)),
        ];
        let mut dn = DistinguishedName::new();
        dn.push(DnType::OrganizationName, "tlspin");
        dn.push(DnType::CommonName, "tlspin test server");
        leaf_params.distinguished_name = dn;

        let leaf_key = KeyPair::generate().expect("leaf key");
        let leaf_cert = leaf_params
            .signed_by(&leaf_key, &issuer)
            .expect("leaf certificate");

        let server_config = ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_protocol_versions(rustls::ALL_VERSIONS)
        .expect("server versions")
        .with_no_client_auth()
        .with_single_cert(
            vec![leaf_cert.der().clone()],
            PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(leaf_key.serialize_der())),
        )
        .expect("server config");

        Self {
            ca_der: ca_cert.der().clone(),
            ca_pem: ca_cert.pem(),
            server_config: Arc::new(server_config),
        }
    }

    /// Client settings trusting only the test CA.
    pub fn client_settings(&self) -> TlsSettings {
        let mut roots = RootCertStore::empty();
        roots.add(self.ca_der.clone()).expect("CA is a valid anchor");
        TlsSettings::with_roots(roots)
    }
}

/// Accept one TLS connection and echo four bytes.
///
/// The negotiated version is sent on the returned channel once the echo is
/// written; the server then drains the connection until the client closes.
pub fn spawn_echo_server(
    config: Arc<ServerConfig>,
) -> (SocketAddr, Receiver<Option<rustls::ProtocolVersion>>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind echo server");
    let addr = listener.local_addr().expect("echo server address");
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || -> io::Result<()> {
        let (sock, _) = listener.accept()?;
        sock.set_read_timeout(Some(Duration::from_secs(10)))?;
        let conn = ServerConnection::new(config).map_err(io::Error::other)?;
        let mut tls = StreamOwned::new(conn, sock);

        let mut buf = [0u8; 4];
        tls.read_exact(&mut buf)?;
        tls.write_all(&buf)?;
        tls.flush()?;
        let _ = tx.send(tls.conn.protocol_version());

        let mut rest = Vec::new();
        let _ = tls.read_to_end(&mut rest);
        Ok(())
    });

    (addr, rx)
}

/// Parameters that keep a misbehaving test from hanging.
pub fn test_params() -> ConnectionParams {
    ConnectionParams::new()
        .connect_timeout(Duration::from_secs(5))
        .so_timeout(Duration::from_secs(10))
}

/// Send `ping` and expect it echoed back.
pub fn ping(socket: &mut Socket) -> io::Result<()> {
    socket.write_all(b"ping")?;
    socket.flush()?;
    let mut buf = [0u8; 4];
    socket.read_exact(&mut buf)?;
    assert_eq!(&buf, b"ping");
    Ok(())
}

pub fn local_listener() -> TcpListener {
    TcpListener::bind("127.0.0.1:0").expect("bind listener")
}

/// What a [`StubFactory`] hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Produce {
    Tls,
    Plain,
    Fail,
}

/// Delegate that connects every request to one local listener.
#[derive(Debug, Clone)]
pub struct StubFactory {
    target: SocketAddr,
    produce: Produce,
    settings: Arc<TlsSettings>,
    pub calls: Arc<AtomicUsize>,
}

impl StubFactory {
    pub fn new(listener: &TcpListener, produce: Produce) -> Self {
        Self {
            target: listener.local_addr().expect("listener address"),
            produce,
            settings: Arc::new(TlsSettings::with_roots(RootCertStore::empty())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn produce(
        &self,
        stream: TcpStream,
        host: &str,
        port: u16,
        auto_close: bool,
    ) -> Result<Socket> {
        match self.produce {
            Produce::Tls => Ok(Socket::Tls(TlsSocket::new(
                stream,
                server_name(host)?,
                self.settings.clone(),
                auto_close,
            ))),
            Produce::Plain => Ok(Socket::Plain(stream)),
            Produce::Fail => Err(stub_error(host, port)),
        }
    }

    fn connect(&self, host: &str, port: u16) -> Result<Socket> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.produce == Produce::Fail {
            return Err(stub_error(host, port));
        }
        let stream = TcpStream::connect(self.target)?;
        self.produce(stream, host, port, true)
    }
}

/// The error a failing [`StubFactory`] returns.
pub fn stub_error(host: &str, port: u16) -> Error {
    Error::new(Kind::Connect)
        .with(io::Error::new(io::ErrorKind::ConnectionRefused, "stub refused"))
        .with_target(host, port)
}

impl SocketFactory for StubFactory {
    fn create_socket(&self, host: &str, port: u16) -> Result<Socket> {
        self.connect(host, port)
    }

    fn create_socket_bound(
        &self,
        host: &str,
        port: u16,
        _local_address: Option<IpAddr>,
        _local_port: u16,
    ) -> Result<Socket> {
        self.connect(host, port)
    }

    fn create_socket_with_params(
        &self,
        host: &str,
        port: u16,
        _local_address: Option<IpAddr>,
        _local_port: u16,
        _params: &ConnectionParams,
    ) -> Result<Socket> {
        self.connect(host, port)
    }

    fn into_secure(
        self: Box<Self>,
    ) -> std::result::Result<Box<dyn SecureSocketFactory>, Box<dyn SocketFactory>> {
        Ok(self)
    }
}

impl SecureSocketFactory for StubFactory {
    fn create_layered_socket(
        &self,
        socket: TcpStream,
        host: &str,
        port: u16,
        auto_close: bool,
    ) -> Result<Socket> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.produce(socket, host, port, auto_close)
    }
}
