use std::process::Command;

fn main() {
    if std::env::var("BUILD_BZ_NOTIFY_MAN").is_ok() {
        assert!(Command::new("pandoc")
            .arg("-s")
            .arg("-f").arg("markdown")
            .arg("-t").arg("man")
            .arg("bz-notify.1.md")
            .arg("-o").arg("bz-notify.1")
            .status()
            .unwrap()
            .success())
    }
}
