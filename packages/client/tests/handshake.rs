//! End-to-end handshakes against a local rustls server.

mod common;

use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::time::Duration;

use common::{TestPki, ping, spawn_echo_server, test_params};
use tlspin_client::{
    ConnectionParams, Kind, ProtocolRestrictingFactory, ProtocolSource, ProtocolVersion, RestrictionConfig,
    RustlsSocketFactory, SecureSocketFactory, SocketFactory, SocketFactoryBuilder, TlsError,
};

fn restricted(pki: &TestPki, protocols: Option<&str>) -> ProtocolRestrictingFactory {
    let source = protocols.map_or(ProtocolSource::Unrestricted, ProtocolSource::fixed);
    ProtocolRestrictingFactory::wrap(
        RustlsSocketFactory::new(pki.client_settings(), test_params()),
        RestrictionConfig::new(source),
    )
    .expect("factory")
}

#[test]
fn tls12_only_list_negotiates_tls12() {
    let pki = TestPki::new();
    let (addr, server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, Some("TLSv1.2"));

    let mut socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("socket");
    ping(&mut socket).expect("echo");

    let tls = socket.as_tls().expect("TLS socket");
    assert_eq!(tls.negotiated_protocol(), Some(ProtocolVersion::Tls12));
    let served = server.recv().expect("server");
    assert_eq!(served, Some(rustls::ProtocolVersion::TLSv1_2));
}

#[test]
fn unrestricted_negotiates_tls13() {
    let pki = TestPki::new();
    let (addr, server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, None);

    let mut socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("socket");
    ping(&mut socket).expect("echo");

    assert_eq!(
        socket.as_tls().and_then(|tls| tls.negotiated_protocol()),
        Some(ProtocolVersion::Tls13)
    );
    server.recv().expect("server");
}

#[test]
fn both_versions_allowed_negotiates_tls13() {
    let pki = TestPki::new();
    let (addr, server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, Some("TLSv1.2,TLSv1.3"));

    let mut socket = factory
        .create_socket_bound("127.0.0.1", addr.port(), None, 0)
        .expect("socket");
    ping(&mut socket).expect("echo");

    assert_eq!(
        socket.as_tls().and_then(|tls| tls.negotiated_protocol()),
        Some(ProtocolVersion::Tls13)
    );
    server.recv().expect("server");
}

#[test]
fn ssl3_list_fails_the_handshake() {
    let pki = TestPki::new();
    let (addr, _server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, Some("SSLv3"));

    let socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("creation succeeds; the list is applied lazily");
    let mut tls = socket.into_tls().expect("TLS socket");

    let err = tls.start_handshake().expect_err("SSLv3 is not negotiable");
    assert_eq!(err.kind(), Kind::Handshake);
    assert!(matches!(
        err.source_as::<TlsError>(),
        Some(TlsError::UnsupportedProtocol(name)) if name == "SSLv3"
    ));
    assert!(tls.is_closed());
}

#[test]
fn unknown_name_fails_on_first_write() {
    let pki = TestPki::new();
    let (addr, _server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, Some("TLSv1.2, TLSv1.3"));

    let mut socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("socket");
    let err = ping(&mut socket).expect_err("\" TLSv1.3\" is not a protocol name");
    assert_eq!(err.kind(), std::io::ErrorKind::ConnectionAborted);
}

#[test]
fn layered_socket_over_existing_connection() {
    let pki = TestPki::new();
    let (addr, server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, Some("TLSv1.2"));

    let stream = TcpStream::connect(addr).expect("plain connection");
    let mut socket = factory
        .create_layered_socket(stream, "localhost", addr.port(), false)
        .expect("layered socket");
    ping(&mut socket).expect("echo");

    let tls = socket.into_tls().expect("TLS socket");
    assert_eq!(tls.negotiated_protocol(), Some(ProtocolVersion::Tls12));
    server.recv().expect("server");

    let returned = tls.close().expect("close");
    assert!(returned.is_some(), "auto_close = false hands the stream back");
}

#[test]
fn explicit_params_are_honored() {
    let pki = TestPki::new();
    let (addr, server) = spawn_echo_server(pki.server_config.clone());
    let factory = restricted(&pki, Some("TLSv1.3"));

    let params = test_params().tcp_nodelay(false);
    let mut socket = factory
        .create_socket_with_params("127.0.0.1", addr.port(), None, 0, &params)
        .expect("socket");
    ping(&mut socket).expect("echo");

    let tls = socket.as_tls().expect("TLS socket");
    let stream = tls.tcp_stream().expect("open stream");
    assert!(!stream.nodelay().expect("nodelay"));
    assert_eq!(tls.negotiated_protocol(), Some(ProtocolVersion::Tls13));
    server.recv().expect("server");
}

#[test]
fn builder_trusts_pem_root() {
    let pki = TestPki::new();
    let (addr, server) = spawn_echo_server(pki.server_config.clone());

    let factory = SocketFactoryBuilder::new()
        .use_webpki_roots(false)
        .add_root_certificate_pem(pki.ca_pem.clone())
        .connection_params(test_params())
        .protocols("TLSv1.2")
        .build()
        .expect("factory");

    let mut socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("socket");
    ping(&mut socket).expect("echo");
    assert_eq!(
        socket.as_tls().and_then(|tls| tls.negotiated_protocol()),
        Some(ProtocolVersion::Tls12)
    );
    server.recv().expect("server");
}

#[test]
fn untrusted_server_fails_verification() {
    let pki = TestPki::new();
    let other = TestPki::new();
    let (addr, _server) = spawn_echo_server(Arc::clone(&pki.server_config));
    let factory = restricted(&other, Some("TLSv1.3"));

    let socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("socket");
    let mut tls = socket.into_tls().expect("TLS socket");
    let err = tls.start_handshake().expect_err("unknown issuer");
    assert!(err.is_handshake());
}

#[test]
fn zero_timeout_is_rejected_without_connecting() {
    let pki = TestPki::new();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind listener");
    let port = listener.local_addr().expect("listener address").port();
    listener.set_nonblocking(true).expect("nonblocking listener");
    let factory = restricted(&pki, Some("TLSv1.3"));

    let params = ConnectionParams::new().so_timeout(Duration::ZERO);
    let err = factory
        .create_socket_with_params("127.0.0.1", port, None, 0, &params)
        .expect_err("zero timeout");

    assert_eq!(err.kind(), Kind::InvalidArgument);
    assert_eq!(err.target(), Some(format!("127.0.0.1:{port}").as_str()));
    assert_eq!(
        listener.accept().err().map(|e| e.kind()),
        Some(ErrorKind::WouldBlock)
    );
}

#[test]
fn alpn_protocol_is_negotiated() {
    let pki = TestPki::new();
    let mut server_config = (*pki.server_config).clone();
    server_config.alpn_protocols = vec![b"http/1.1".to_vec()];
    let (addr, server) = spawn_echo_server(Arc::new(server_config));

    let settings = pki
        .client_settings()
        .with_alpn_protocols(vec![b"h2".to_vec(), b"http/1.1".to_vec()]);
    let factory = ProtocolRestrictingFactory::wrap(
        RustlsSocketFactory::new(settings, test_params()),
        RestrictionConfig::new(ProtocolSource::fixed("TLSv1.3")),
    )
    .expect("factory");

    let mut socket = factory
        .create_socket("127.0.0.1", addr.port())
        .expect("socket");
    ping(&mut socket).expect("echo");

    let tls = socket.as_tls().expect("TLS socket");
    assert_eq!(tls.alpn_protocol(), Some(&b"http/1.1"[..]));
    server.recv().expect("server");
}
