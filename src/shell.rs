//! # Interactive Shell
//!
//! Line-oriented front end over the [`Facade`]. Each input line is one
//! command; responses are single strings, with facade errors rendered
//! through the fixed user-facing sentences. The shell keeps at most one
//! open session and shows its login in the prompt.

use anyhow::Result;
use std::io::Write;

use crate::facade::{self, Facade};

const HELP: &str = "\
Accounts:
  register <login> <password> <name>  create an account
  login <login> [password]            open a session (prompts when omitted)
  logout                              forget the current session token
  whoami                              show the current login
  set <attribute> <value>             set a profile attribute
  get <login> <attribute>             read a profile attribute
  delete-account <login>              delete your account (confirm with your login)
Relationships:
  friend <login>                      request or accept a friendship
  friends [login]                     list friends
  idol <login>                        declare an idol
  fans [login]                        list fans
  crush <login>                       declare a crush
  crushes                             list your crushes
  enemy <login>                       declare an enemy
Messages:
  msg <login> <text>                  send a direct message
  read                                read your oldest direct message
Communities:
  community <name> <description>      create a community
  join <name>                         join a community
  info <name>                         show description and owner
  members <name>                      list members
  communities [login]                 list a user's communities
  post <name> <text>                  broadcast to a community
  readpost                            read your oldest broadcast
Other:
  status                              show user/community/session counts
  reset yes                           wipe all state and the snapshot
  help                                this text
  quit                                leave the shell";

const NOT_LOGGED_IN: &str = "You must log in first.";

fn reply(result: Result<(), crate::social::SocialError>, ok: &str) -> String {
    match result {
        Ok(()) => ok.to_string(),
        Err(e) => facade::user_message(&e),
    }
}

fn reply_text(result: Result<String, crate::social::SocialError>) -> String {
    match result {
        Ok(text) => text,
        Err(e) => facade::user_message(&e),
    }
}

/// Interactive command loop bound to one facade and at most one session.
pub struct Shell {
    facade: Facade,
    token: Option<String>,
    login: Option<String>,
}

impl Shell {
    pub fn new(facade: Facade) -> Self {
        Shell {
            facade,
            token: None,
            login: None,
        }
    }

    /// Read lines from stdin until EOF or `quit`.
    pub async fn run(&mut self) -> Result<()> {
        println!("Rede interactive shell. Type 'help' for commands.");
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            match &self.login {
                Some(login) => print!("{}> ", login),
                None => print!("> "),
            }
            std::io::stdout().flush()?;
            line.clear();
            if stdin.read_line(&mut line)? == 0 {
                break;
            }
            match self.dispatch(line.trim()).await? {
                Some(output) => {
                    if !output.is_empty() {
                        println!("{}", output);
                    }
                }
                None => break,
            }
        }
        Ok(())
    }

    /// Execute one command line. `Ok(None)` means the shell should exit.
    pub async fn dispatch(&mut self, line: &str) -> Result<Option<String>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Some(String::new()));
        }
        let mut words = line.split_whitespace();
        let cmd = words.next().unwrap_or("").to_lowercase();
        let args: Vec<&str> = words.collect();

        let out = match cmd.as_str() {
            "quit" | "exit" => return Ok(None),
            "help" => HELP.to_string(),
            "register" => {
                // register <login> <password> <display name...>
                let mut p = line.splitn(4, ' ');
                p.next();
                match (p.next(), p.next(), p.next().map(str::trim)) {
                    (Some(login), Some(password), Some(name)) if !name.is_empty() => reply(
                        self.facade.register(login, password, name).await,
                        "Account created.",
                    ),
                    _ => "Usage: register <login> <password> <name>".to_string(),
                }
            }
            "login" => {
                let Some(login) = args.first().copied() else {
                    return Ok(Some("Usage: login <login> [password]".to_string()));
                };
                let password = match args.get(1) {
                    Some(p) => (*p).to_string(),
                    None if atty::is(atty::Stream::Stdin) => {
                        rpassword::prompt_password("Password: ")?
                    }
                    None => return Ok(Some("Usage: login <login> <password>".to_string())),
                };
                match self.facade.login(login, &password).await {
                    Ok(token) => {
                        self.token = Some(token);
                        self.login = Some(login.to_string());
                        format!("Logged in as {}.", login)
                    }
                    Err(e) => facade::user_message(&e),
                }
            }
            "logout" => {
                if self.token.take().is_some() {
                    self.login = None;
                    "Logged out.".to_string()
                } else {
                    "Not logged in.".to_string()
                }
            }
            "whoami" => match &self.login {
                Some(login) => format!("Logged in as {}.", login),
                None => "Not logged in.".to_string(),
            },
            "set" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let mut p = line.splitn(3, ' ');
                p.next();
                match (p.next(), p.next().map(str::trim)) {
                    (Some(attr), Some(value)) if !value.is_empty() => reply(
                        self.facade.set_attribute(&token, attr, value).await,
                        "Attribute set.",
                    ),
                    _ => "Usage: set <attribute> <value>".to_string(),
                }
            }
            "get" => match (args.first(), args.get(1)) {
                (Some(login), Some(attr)) => reply_text(self.facade.attribute(login, attr)),
                _ => "Usage: get <login> <attribute>".to_string(),
            },
            "delete-account" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let current = self.login.clone().unwrap_or_default();
                if args.first().copied() != Some(current.as_str()) {
                    format!("Type 'delete-account {}' to confirm.", current)
                } else {
                    match self.facade.delete_account(&token).await {
                        Ok(()) => {
                            self.token = None;
                            self.login = None;
                            "Account deleted.".to_string()
                        }
                        Err(e) => facade::user_message(&e),
                    }
                }
            }
            "friend" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let Some(target) = args.first().copied() else {
                    return Ok(Some("Usage: friend <login>".to_string()));
                };
                match self.facade.request_friend(&token, target).await {
                    Ok(()) => {
                        let login = self.login.clone().unwrap_or_default();
                        if self.facade.is_friend(&login, target).unwrap_or(false) {
                            format!("You are now friends with {}.", target)
                        } else {
                            format!("Friend request sent to {}.", target)
                        }
                    }
                    Err(e) => facade::user_message(&e),
                }
            }
            "friends" => {
                let login = match args.first() {
                    Some(l) => (*l).to_string(),
                    None => match &self.login {
                        Some(l) => l.clone(),
                        None => return Ok(Some("Usage: friends <login>".to_string())),
                    },
                };
                reply_text(self.facade.friends(&login))
            }
            "idol" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let Some(idol) = args.first().copied() else {
                    return Ok(Some("Usage: idol <login>".to_string()));
                };
                reply(self.facade.add_idol(&token, idol).await, "Idol added.")
            }
            "fans" => {
                let login = match args.first() {
                    Some(l) => (*l).to_string(),
                    None => match &self.login {
                        Some(l) => l.clone(),
                        None => return Ok(Some("Usage: fans <login>".to_string())),
                    },
                };
                reply_text(self.facade.fans(&login))
            }
            "crush" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let Some(target) = args.first().copied() else {
                    return Ok(Some("Usage: crush <login>".to_string()));
                };
                reply(self.facade.add_crush(&token, target).await, "Crush added.")
            }
            "crushes" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                reply_text(self.facade.crushes(&token))
            }
            "enemy" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let Some(enemy) = args.first().copied() else {
                    return Ok(Some("Usage: enemy <login>".to_string()));
                };
                reply(self.facade.add_enemy(&token, enemy).await, "Enemy declared.")
            }
            "msg" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let mut p = line.splitn(3, ' ');
                p.next();
                match (p.next(), p.next().map(str::trim)) {
                    (Some(recipient), Some(text)) if !text.is_empty() => reply(
                        self.facade.send_message(&token, recipient, text).await,
                        "Message sent.",
                    ),
                    _ => "Usage: msg <login> <text>".to_string(),
                }
            }
            "read" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                reply_text(self.facade.read_message(&token).await)
            }
            "community" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let mut p = line.splitn(3, ' ');
                p.next();
                match (p.next(), p.next().map(str::trim)) {
                    (Some(name), Some(description)) if !description.is_empty() => reply(
                        self.facade.create_community(&token, name, description).await,
                        "Community created.",
                    ),
                    _ => "Usage: community <name> <description>".to_string(),
                }
            }
            "join" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let Some(name) = args.first().copied() else {
                    return Ok(Some("Usage: join <name>".to_string()));
                };
                reply(
                    self.facade.join_community(&token, name).await,
                    "Joined community.",
                )
            }
            "info" => {
                let Some(name) = args.first().copied() else {
                    return Ok(Some("Usage: info <name>".to_string()));
                };
                match (
                    self.facade.community_description(name),
                    self.facade.community_owner(name),
                ) {
                    (Ok(description), Ok(owner)) => {
                        format!("{} (owner: {})", description, owner)
                    }
                    (Err(e), _) | (_, Err(e)) => facade::user_message(&e),
                }
            }
            "members" => {
                let Some(name) = args.first().copied() else {
                    return Ok(Some("Usage: members <name>".to_string()));
                };
                reply_text(self.facade.community_members(name))
            }
            "communities" => {
                let login = match args.first() {
                    Some(l) => (*l).to_string(),
                    None => match &self.login {
                        Some(l) => l.clone(),
                        None => return Ok(Some("Usage: communities <login>".to_string())),
                    },
                };
                reply_text(self.facade.communities_of(&login))
            }
            "post" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                let mut p = line.splitn(3, ' ');
                p.next();
                match (p.next(), p.next().map(str::trim)) {
                    (Some(name), Some(text)) if !text.is_empty() => reply(
                        self.facade.broadcast(&token, name, text).await,
                        "Broadcast posted.",
                    ),
                    _ => "Usage: post <name> <text>".to_string(),
                }
            }
            "readpost" => {
                let Some(token) = self.token.clone() else {
                    return Ok(Some(NOT_LOGGED_IN.to_string()));
                };
                reply_text(self.facade.read_broadcast(&token).await)
            }
            "status" => {
                let summary = self.facade.status();
                format!(
                    "{} users, {} communities, {} active sessions",
                    summary.users, summary.communities, summary.sessions
                )
            }
            "reset" => {
                if args.first().copied() != Some("yes") {
                    "Type 'reset yes' to wipe all state.".to_string()
                } else {
                    self.facade.reset().await?;
                    self.token = None;
                    self.login = None;
                    "All state wiped.".to_string()
                }
            }
            other => format!("Unknown command '{}'. Type 'help'.", other),
        };
        Ok(Some(out))
    }
}
