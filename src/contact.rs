/// Order contacts shown in the header and on every product card
///
/// Links are handed to the desktop's default handler (dialer, browser).

use std::io;
use std::process::Command;

/// Display form of the order line
pub const ORDER_PHONE: &str = "+91 81006 20066";

const CALL_LINK: &str = "tel:+918100620066";
const WHATSAPP_LINK: &str = "https://wa.me/918100620066";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Call,
    WhatsApp,
}

impl Contact {
    pub fn link(self) -> &'static str {
        match self {
            Contact::Call => CALL_LINK,
            Contact::WhatsApp => WHATSAPP_LINK,
        }
    }
}

/// Open `url` with the platform's URL handler without waiting for it
pub fn open_link(url: &str) -> io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(url);
        command
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        // The empty argument is `start`'s window title
        command.args(["/C", "start", "", url]);
        command
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    };

    command.spawn().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> String {
        s.chars().filter(char::is_ascii_digit).collect()
    }

    #[test]
    fn test_links_dial_the_displayed_number() {
        let number = digits(ORDER_PHONE);

        assert_eq!(Contact::Call.link(), format!("tel:+{number}"));
        assert_eq!(Contact::WhatsApp.link(), format!("https://wa.me/{number}"));
    }
}
