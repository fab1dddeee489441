//! A stand-in for the load balancer's stats socket.

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixListener;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use hapctl_config::SocketEndpoint;
use tempfile::TempDir;

const STATS_RESPONSE: &str = concat!(
    "# pxname,svname,status,weight,downtime,\n",
    "web,FRONTEND,OPEN,,,\n",
    "web,srv1,UP,100,0,\n",
    "web,srv2,MAINT,50,3725,\n",
    "web,BACKEND,UP,150,0,\n",
);

const UNEXPECTED: &str = "<unexpected connection>";

/// Serves a fixed number of one-shot connections on a temporary Unix socket.
///
/// `show stat` is answered with [`STATS_RESPONSE`]; every other command gets
/// the configured reply. Connections beyond the expected count are reported
/// by [`FakeHaproxy::finish`].
pub(super) struct FakeHaproxy {
    _dir: TempDir,
    endpoint: SocketEndpoint,
    done: Sender<()>,
    handle: JoinHandle<Vec<String>>,
}

impl FakeHaproxy {
    pub(super) fn start(connections: usize, reply: &'static str) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("haproxy.sock");
        let listener = UnixListener::bind(&path).expect("bind fake socket");
        let endpoint = SocketEndpoint::unix(path.to_str().expect("utf8 socket path"));
        let (done, finished) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            let mut received = Vec::new();
            for _ in 0..connections {
                let (stream, _) = listener.accept().expect("accept");
                let mut reader = BufReader::new(stream);
                let mut line = String::new();
                reader.read_line(&mut line).expect("read command");
                let command = line.trim_end().to_owned();
                let answer = if command == "show stat" {
                    STATS_RESPONSE
                } else {
                    reply
                };
                reader
                    .get_mut()
                    .write_all(answer.as_bytes())
                    .expect("write reply");
                received.push(command);
            }

            // Wait for the client to finish before checking for stragglers.
            let _ = finished.recv();
            listener.set_nonblocking(true).expect("nonblocking listener");
            while listener.accept().is_ok() {
                received.push(String::from(UNEXPECTED));
            }
            received
        });

        Self {
            _dir: dir,
            endpoint,
            done,
            handle,
        }
    }

    pub(super) fn endpoint(&self) -> SocketEndpoint {
        self.endpoint.clone()
    }

    /// Returns every command line received, in order.
    pub(super) fn finish(self) -> Vec<String> {
        let _ = self.done.send(());
        self.handle.join().expect("fake socket thread")
    }
}
