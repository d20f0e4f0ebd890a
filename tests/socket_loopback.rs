// Real transport task against an in-process Socket.IO server.

use std::time::Duration;

use cardtable::app::register_handlers;
use cardtable::connection::socket_endpoint;
use cardtable::{App, Command, Connection, Outcome};
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tungstenite::protocol::Message;

const HANDSHAKE: &str =
    r#"0{"sid":"loop-1","upgrades":[],"pingInterval":25000,"pingTimeout":20000,"maxPayload":1000000}"#;

async fn next_text(ws: &mut WebSocketStream<TcpStream>) -> String {
    loop {
        match ws.next().await {
            Some(Ok(Message::Text(t))) => return t,
            Some(Ok(_)) => continue,
            other => panic!("socket ended early: {other:?}"),
        }
    }
}

#[tokio::test]
async fn loopback_session_syncs_board() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

        ws.send(Message::Text(HANDSHAKE.into())).await.unwrap();
        assert_eq!(next_text(&mut ws).await, "40");
        ws.send(Message::Text(r#"40{"sid":"ns-1"}"#.into())).await.unwrap();

        ws.send(Message::Text("2".into())).await.unwrap();
        assert_eq!(next_text(&mut ws).await, "3");

        ws.send(Message::Text(
            r#"42["cards",[{"id":1,"url":"u1","name":"Forest","x":10,"y":20,"locked":false,"tapped":false},{"id":2,"url":"u2","name":"Island","x":30,"y":40,"locked":true,"tapped":true}]]"#.into(),
        ))
        .await
        .unwrap();
        ws.send(Message::Text(r#"42["deckCountChange",42]"#.into())).await.unwrap();

        let request = next_text(&mut ws).await;
        let goodbye = next_text(&mut ws).await;
        (request, goodbye)
    });

    let endpoint = socket_endpoint(&format!("http://{addr}"), "/socket.io/").unwrap();
    let mut conn: Connection<App> = Connection::new(endpoint);
    register_handlers(&mut conn).unwrap();
    conn.open().unwrap();
    let mut app = App::default();

    timeout(Duration::from_secs(5), async {
        while app.decks().remaining() != 42 {
            let frame = conn.next_frame().await.expect("socket task ended");
            conn.dispatch(&mut app, frame);
        }
    })
    .await
    .expect("board never synced");

    let names: Vec<&str> = app.board().cards().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Forest", "Island"]);
    assert!(app.board().cards()[1].tapped);

    assert_eq!(app.run(Command::RequestDecks, &conn), Outcome::Sent("getDecks"));
    conn.close();

    let (request, goodbye) = timeout(Duration::from_secs(5), server)
        .await
        .expect("server timed out")
        .unwrap();
    assert_eq!(request, r#"42["getDecks"]"#);
    assert_eq!(goodbye, "41");

    conn.join(Duration::from_secs(1)).await;
}

#[tokio::test]
async fn refused_connection_reports_connect_error() {
    // Bind then drop to get a port nobody listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let endpoint = socket_endpoint(&format!("ws://{addr}"), "/socket.io/").unwrap();
    let mut conn: Connection<Vec<String>> = Connection::new(endpoint);
    conn.on("connect_error", |seen: &mut Vec<String>, reason| {
        seen.push(reason.to_string());
        Ok(())
    })
    .unwrap();
    conn.open().unwrap();

    let frame = timeout(Duration::from_secs(5), conn.next_frame())
        .await
        .expect("no connect_error")
        .expect("channel closed without a frame");
    let mut seen = Vec::new();
    conn.dispatch(&mut seen, frame);

    assert_eq!(seen.len(), 1);
    assert!(!cardtable::Outbound::is_connected(&conn));
}
