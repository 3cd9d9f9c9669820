use clap::{Arg, ArgAction, Command};

pub const CMD_REGISTER: &str = "register";
pub const CMD_VERIFY: &str = "verify";
pub const CMD_RESEND: &str = "resend";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_OPEN: &str = "open";
pub const CMD_STATUS: &str = "status";

pub const ARG_NAME: &str = "name";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PHONE: &str = "phone";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CODE: &str = "code";
pub const ARG_NO_WAIT: &str = "no-wait";
pub const ARG_URL: &str = "url";

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("HOTELITUSS_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn email_arg() -> Arg {
    Arg::new(ARG_EMAIL)
        .short('e')
        .long(ARG_EMAIL)
        .help("Email address")
        .required(true)
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Submit the registration form and request a verification code")
                .arg(
                    Arg::new(ARG_NAME)
                        .short('n')
                        .long(ARG_NAME)
                        .help("Full name (letters and spaces)")
                        .required(true),
                )
                .arg(email_arg())
                .arg(
                    Arg::new(ARG_PHONE)
                        .long(ARG_PHONE)
                        .help("Phone number (digits)")
                        .required(true),
                )
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_VERIFY)
                .about("Enter the six-character code sent by email")
                .arg(
                    Arg::new(ARG_CODE)
                        .short('c')
                        .long(ARG_CODE)
                        .help("Verification code")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_RESEND)
                .about("Request a new verification code")
                .arg(
                    Arg::new(ARG_NO_WAIT)
                        .long(ARG_NO_WAIT)
                        .help("Exit without rendering the resend countdown")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Sign in and hand the session over to the reservations site")
                .arg(email_arg())
                .arg(password_arg()),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Clear the session on the selected origin"))
        .subcommand(
            Command::new(CMD_OPEN)
                .about("Load a page URL, consuming any handoff marker it carries")
                .arg(Arg::new(ARG_URL).help("Page URL").required(true)),
        )
        .subcommand(Command::new(CMD_STATUS).about("Show the navigation state of the selected origin"))
}
