//! Integration tests for the `ggnet` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const HELLO_BUCKET: &str = "3857b";

/// `ggnet` rooted at `net` inside `tmp`, logging only errors.
fn ggnet_with(tmp: &TempDir, transform: &str) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ggnet"));
    cmd.env("RUST_LOG", "error")
        .current_dir(tmp.path())
        .args(["--root", "net", "--transform", transform]);
    cmd
}

fn ggnet(tmp: &TempDir) -> Command {
    ggnet_with(tmp, "cas")
}

mod store {
    use super::*;

    #[test]
    fn peer_scenario_round_trip() {
        let tmp = TempDir::new().unwrap();

        ggnet(&tmp)
            .args(["put", "peerA", "hello.txt"])
            .write_stdin("hi")
            .assert()
            .success()
            .stdout("2\n");

        ggnet(&tmp).args(["has", "peerA", "hello.txt"]).assert().success().stdout("true\n");
        ggnet(&tmp).args(["get", "peerA", "hello.txt"]).assert().success().stdout("hi");

        ggnet(&tmp)
            .args(["path", "peerA", "hello.txt"])
            .assert()
            .success()
            .stdout(predicate::str::contains("net_storage"))
            .stdout(predicate::str::contains(HELLO_BUCKET))
            .stdout(predicate::str::ends_with("3857b672471862eab426eba0622e44bd2cedbd5d\n"));

        ggnet(&tmp).args(["delete", "peerA", "hello.txt"]).assert().success();
        ggnet(&tmp).args(["has", "peerA", "hello.txt"]).assert().success().stdout("false\n");
        assert!(!tmp.path().join("net_storage/peerA").join(HELLO_BUCKET).exists());
    }

    #[test]
    fn put_from_file_and_get_to_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("in.bin"), vec![9u8; 70_000]).unwrap();

        ggnet(&tmp).args(["put", "p", "blob", "in.bin"]).assert().success().stdout("70000\n");
        ggnet(&tmp).args(["get", "p", "blob", "-o", "out.bin"]).assert().success().stdout("");

        assert_eq!(fs::read(tmp.path().join("out.bin")).unwrap(), vec![9u8; 70_000]);
    }

    #[test]
    fn get_missing_object_fails() {
        let tmp = TempDir::new().unwrap();

        ggnet(&tmp)
            .args(["get", "p", "absent"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Object not found"));
    }

    #[test]
    fn drop_namespace_and_clear() {
        let tmp = TempDir::new().unwrap();
        ggnet(&tmp).args(["put", "a", "k"]).write_stdin("1").assert().success();
        ggnet(&tmp).args(["put", "b", "k"]).write_stdin("2").assert().success();

        ggnet(&tmp).args(["drop-namespace", "a"]).assert().success();
        ggnet(&tmp).args(["has", "a", "k"]).assert().stdout("false\n");
        ggnet(&tmp).args(["has", "b", "k"]).assert().stdout("true\n");

        ggnet(&tmp).arg("clear").assert().success();
        assert!(!tmp.path().join("net_storage").exists());
    }

    #[test]
    fn traversal_is_refused() {
        let tmp = TempDir::new().unwrap();

        ggnet_with(&tmp, "identity")
            .args(["put", "p", "../../escape"])
            .write_stdin("x")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Path traversal"));
        assert!(!tmp.path().join("escape").exists());
    }
}

mod config {
    use super::*;

    #[test]
    fn unknown_transform_is_rejected() {
        let tmp = TempDir::new().unwrap();

        ggnet_with(&tmp, "md5")
            .args(["has", "p", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown path transform"));
    }

    #[test]
    fn file_and_environment_are_layered() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("node.toml"), "[store]\nroot = \"from-file\"\n").unwrap();

        Command::new(env!("CARGO_BIN_EXE_ggnet"))
            .current_dir(tmp.path())
            .env("RUST_LOG", "error")
            .env("GGNET__STORE__SANITIZER", "strict")
            .args(["--config", "node.toml", "path", "../peer", "key"])
            .assert()
            .success()
            .stdout(predicate::str::contains("from-file_storage"))
            .stdout(predicate::str::contains("peer"))
            .stdout(predicate::str::contains("..").not());
    }

    #[test]
    fn missing_config_file_fails() {
        let tmp = TempDir::new().unwrap();

        ggnet(&tmp)
            .args(["--config", "absent.toml", "has", "p", "k"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration is malformed"));
    }
}

mod keys {
    use super::*;

    #[test]
    fn keygen_prints_hex_key() {
        let tmp = TempDir::new().unwrap();

        ggnet(&tmp)
            .arg("keygen")
            .assert()
            .success()
            .stdout(predicate::str::is_match("^[0-9a-f]{64}\n$").unwrap());
        assert!(!tmp.path().join("net_storage").exists());
    }

    #[test]
    fn encrypt_then_put_encrypted() {
        let tmp = TempDir::new().unwrap();
        let key = "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4";
        fs::write(tmp.path().join("plain.txt"), "streamed secret").unwrap();

        ggnet(&tmp)
            .args(["encrypt", "--key", key, "plain.txt", "-o", "sealed.bin"])
            .assert()
            .success();
        assert_eq!(fs::metadata(tmp.path().join("sealed.bin")).unwrap().len(), 16 + 15);

        ggnet(&tmp)
            .args(["put-encrypted", "peerA", "doc", "--with-key", key, "sealed.bin"])
            .assert()
            .success()
            .stdout("15\n");

        ggnet(&tmp).args(["get", "peerA", "doc"]).assert().success().stdout("streamed secret");
    }

    #[test]
    fn truncated_stream_is_a_cipher_error() {
        let tmp = TempDir::new().unwrap();
        let key = "00".repeat(32);

        ggnet(&tmp)
            .args(["put-encrypted", "p", "k", "--with-key", &key])
            .write_stdin("short")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Stream decryption failure"));
    }
}
