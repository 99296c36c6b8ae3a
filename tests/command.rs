mod common;

use std::io;

use common::{FakeMemcached, ScriptedStream};
use mcli::{Command, McClient, McError, Output, DEFAULT_CHUNK_SIZE};

fn client(server: FakeMemcached) -> McClient<FakeMemcached> {
    McClient::new(server, DEFAULT_CHUNK_SIZE).expect("client")
}

#[test]
fn commands_are_looked_up_by_name() {
    assert_eq!("get".parse::<Command>().unwrap(), Command::Get);
    assert_eq!("keys".parse::<Command>().unwrap(), Command::Keys);
    assert_eq!("flush".parse::<Command>().unwrap(), Command::Flush);
    match "drop".parse::<Command>() {
        Err(McError::Parsing(msg)) => assert_eq!(msg, "command not support"),
        other => panic!("expected a parsing error, got {:?}", other),
    }
}

#[test]
fn get_passes_the_reply_through() {
    let reply = "VALUE k 0 5\r\nhello\r\nEND\r\n";
    let mut client = client(FakeMemcached::new().reply("get k", reply));
    let output = Command::Get.execute(&mut client, &["k"]).expect("get");
    assert_eq!(output, Output::Text(reply.to_string()));
}

#[test]
fn get_reply_of_exact_chunk_size_survives_read_timeout() {
    let stream = ScriptedStream::new(vec![
        Ok(b"VALUE\r\n!".to_vec()),
        Err(io::Error::new(io::ErrorKind::WouldBlock, "read timed out")),
    ]);
    let mut client = McClient::new(stream, 8).expect("client");

    let output = Command::Get.execute(&mut client, &["k"]).expect("get");
    assert_eq!(output, Output::Text("VALUE\r\n!".to_string()));
}

#[test]
fn get_without_key_sends_nothing() {
    let mut client = client(FakeMemcached::new());
    let output = Command::Get.execute(&mut client, &[]).expect("get");
    assert_eq!(output, Output::Text(String::new()));
    assert!(client.get_ref().commands.is_empty());
}

#[test]
fn set_sends_a_storage_command_with_data_block() {
    let server = FakeMemcached::new()
        .reply("set k 0 0 5", "")
        .reply("hello", "STORED\r\n");
    let mut client = client(server);
    let output = Command::Set.execute(&mut client, &["k", "hello"]).expect("set");

    assert_eq!(output, Output::Text("STORED\r\n".to_string()));
    assert_eq!(client.get_ref().commands, vec!["set k 0 0 5", "hello"]);
}

#[test]
fn add_accepts_flags_and_expiry() {
    let server = FakeMemcached::new()
        .reply("add k 3 60 2", "")
        .reply("hi", "NOT_STORED\r\n");
    let mut client = client(server);
    let output = Command::Add.execute(&mut client, &["k", "hi", "3", "60"]).expect("add");
    assert_eq!(output, Output::Text("NOT_STORED\r\n".to_string()));
}

#[test]
fn storage_commands_need_key_and_value() {
    let mut client = client(FakeMemcached::new());
    assert_eq!(Command::Set.execute(&mut client, &["k"]).expect("set"), Output::Bool(false));
    assert_eq!(Command::Add.execute(&mut client, &[]).expect("add"), Output::Bool(false));
    assert!(client.get_ref().commands.is_empty());
}

#[test]
fn del_reports_the_servers_answer() {
    let mut client = client(FakeMemcached::new().reply("delete k", "NOT_FOUND\r\n"));
    let output = Command::Del.execute(&mut client, &["k"]).expect("del");
    assert_eq!(output, Output::Text("NOT_FOUND\r\n".to_string()));
    assert_eq!(Command::Del.execute(&mut client, &[]).expect("del"), Output::Bool(false));
}

#[test]
fn stats_with_and_without_group() {
    let server = FakeMemcached::new()
        .reply("stats", "STAT pid 1\r\nEND\r\n")
        .reply("stats slabs", "STAT active_slabs 0\r\nEND\r\n");
    let mut client = client(server);

    let all = Command::Stats.execute(&mut client, &[]).expect("stats");
    assert_eq!(all.to_string(), "STAT pid 1\r\nEND\r\n");
    let slabs = Command::Stats.execute(&mut client, &["slabs"]).expect("stats");
    assert_eq!(slabs.to_string(), "STAT active_slabs 0\r\nEND\r\n");
}

#[test]
fn bool_output_displays_as_word() {
    assert_eq!(Output::Bool(true).to_string(), "true");
    assert_eq!(Output::Bool(false).to_string(), "false");
}
