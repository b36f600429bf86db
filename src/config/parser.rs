//! Context-driven statement parser (§4.2). Consumes the token stream from
//! `token::Lexer`, accumulates statements, and dispatches by terminator.

use super::model::{LocationBlock, Modifier, ServerConfig, ServerType};
use super::path_clean::{clean, PathKind};
use super::token::{Lexer, Token};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Main,
    Http,
    Server,
    Location,
}

impl Context {
    fn name(self) -> &'static str {
        match self {
            Context::Main => "main",
            Context::Http => "http",
            Context::Server => "server",
            Context::Location => "location",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrevTok {
    Init,
    Word,
    BlockStart,
    BlockEnd,
    Semicolon,
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    working_directory: String,
    context: Context,
    configs: Vec<ServerConfig>,
    current_server: Option<ServerConfig>,
    current_location: Option<LocationBlock>,
}

/// Parses a complete nginx-style config document.
pub fn parse(source: &str, working_directory: &str) -> Result<Vec<ServerConfig>, ConfigError> {
    let mut parser = Parser {
        lexer: Lexer::new(source.as_bytes()),
        working_directory: working_directory.to_string(),
        context: Context::Main,
        configs: Vec::new(),
        current_server: None,
        current_location: None,
    };
    parser.run()
}

impl<'a> Parser<'a> {
    fn run(&mut self) -> Result<Vec<ServerConfig>, ConfigError> {
        let mut statement: Vec<String> = Vec::new();
        let mut prev = PrevTok::Init;

        loop {
            let tok = self.lexer.next_token();
            match tok {
                Token::Invalid(t) => return Err(ConfigError::InvalidToken(t)),

                Token::Comment(_) => continue,

                Token::Word(w) => {
                    statement.push(w);
                    prev = PrevTok::Word;
                }

                Token::QuoteWord(q) => {
                    statement.push(strip_quotes(&q));
                    prev = PrevTok::Word;
                }

                Token::BlockStart => {
                    if prev != PrevTok::Word {
                        return Err(ConfigError::InvalidTransition("{".to_string()));
                    }
                    statement.push("{".to_string());
                    self.parse_block_start(&statement)?;
                    statement.clear();
                    prev = PrevTok::BlockStart;
                }

                Token::BlockEnd => {
                    let allowed = matches!(prev, PrevTok::Semicolon | PrevTok::BlockEnd)
                        || (self.context == Context::Location && prev == PrevTok::BlockStart);
                    if !allowed {
                        return Err(ConfigError::InvalidTransition("}".to_string()));
                    }
                    self.parse_block_end()?;
                    statement.clear();
                    prev = PrevTok::BlockEnd;
                }

                Token::Semicolon => {
                    if prev != PrevTok::Word {
                        return Err(ConfigError::InvalidTransition(";".to_string()));
                    }
                    self.parse_statement(&statement)?;
                    statement.clear();
                    prev = PrevTok::Semicolon;
                }

                Token::Eof => {
                    if prev != PrevTok::BlockEnd && prev != PrevTok::Init {
                        return Err(ConfigError::UnexpectedEof(self.context.name()));
                    }
                    if self.context != Context::Main {
                        return Err(ConfigError::UnexpectedEof(self.context.name()));
                    }
                    return self.finish();
                }
            }
        }
    }

    fn finish(&mut self) -> Result<Vec<ServerConfig>, ConfigError> {
        if self.configs.is_empty() {
            return Err(ConfigError::Empty);
        }
        Ok(std::mem::take(&mut self.configs))
    }

    fn parse_block_start(&mut self, statement: &[String]) -> Result<(), ConfigError> {
        let head = statement[0].as_str();
        match head {
            "http" => {
                expect_size("http", statement.len(), 2)?;
                if self.context != Context::Main {
                    return Err(ConfigError::InvalidTransition("http".to_string()));
                }
                self.context = Context::Http;
            }
            "server" => {
                expect_size("server", statement.len(), 2)?;
                if self.context != Context::Http {
                    return Err(ConfigError::InvalidTransition("server".to_string()));
                }
                self.context = Context::Server;
                self.current_server = Some(ServerConfig::default());
            }
            "location" => {
                if statement.len() != 3 && statement.len() != 4 {
                    return Err(ConfigError::MalformedBlock {
                        context: "location",
                        actual: statement.len(),
                        expected: 4,
                    });
                }
                if self.context != Context::Server {
                    return Err(ConfigError::InvalidTransition("location".to_string()));
                }
                let (modifier, case_sensitive, uri) = if statement.len() == 4 {
                    let (m, cs) = Modifier::from_token(&statement[1])
                        .ok_or_else(|| ConfigError::UnknownModifier(statement[1].clone()))?;
                    (m, cs, statement[2].clone())
                } else {
                    (Modifier::NoModifier, false, statement[1].clone())
                };
                self.context = Context::Location;
                self.current_location = Some(LocationBlock::new(uri, modifier, case_sensitive));
            }
            other => return Err(ConfigError::UnknownContext(other.to_string())),
        }
        Ok(())
    }

    fn parse_block_end(&mut self) -> Result<(), ConfigError> {
        match self.context {
            Context::Location => {
                let loc = self
                    .current_location
                    .take()
                    .expect("location context implies current_location is set");
                let server = self
                    .current_server
                    .as_mut()
                    .expect("location context implies current_server is set");
                server.push_location(loc.modifier, loc);
                self.context = Context::Server;
            }
            Context::Server => {
                let mut server = self
                    .current_server
                    .take()
                    .expect("server context implies current_server is set");
                inherit_location_fields(&mut server);
                server
                    .validate()
                    .map_err(ConfigError::ServerValidation)?;
                self.configs.push(server);
                self.context = Context::Http;
            }
            Context::Http => {
                self.context = Context::Main;
            }
            Context::Main => {
                return Err(ConfigError::InvalidTransition("}".to_string()));
            }
        }
        Ok(())
    }

    fn parse_statement(&mut self, statement: &[String]) -> Result<(), ConfigError> {
        match self.context {
            Context::Server => self.parse_server_statement(statement),
            Context::Location => self.parse_location_statement(statement),
            Context::Http | Context::Main => {
                Err(ConfigError::UnexpectedStatement(self.context.name()))
            }
        }
    }

    fn parse_server_statement(&mut self, statement: &[String]) -> Result<(), ConfigError> {
        let server = self
            .current_server
            .as_mut()
            .expect("server statements only parsed inside a server block");
        let arg = statement[0].as_str();
        let wd = self.working_directory.as_str();

        match arg {
            "listen" => {
                if statement.len() < 2 || statement.len() > 3 {
                    return Err(ConfigError::MalformedDirective {
                        directive: "listen",
                        detail: format!("expected 1-2 args, got {}", statement.len() - 1),
                    });
                }
                server.port = statement[1]
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort(statement[1].clone()))?;
                if statement.len() == 3 {
                    if statement[2] != "ssl" {
                        return Err(ConfigError::MalformedDirective {
                            directive: "listen",
                            detail: format!("unknown listen option \"{}\"", statement[2]),
                        });
                    }
                    server.server_type = ServerType::HttpsServer;
                } else {
                    server.server_type = ServerType::HttpServer;
                }
            }
            "index" => {
                require_arity(arg, statement, 2)?;
                server.index = clean(&statement[1], PathKind::FileUri, wd);
            }
            "root" => {
                require_arity(arg, statement, 2)?;
                server.root = clean(&statement[1], PathKind::DirOnly, wd);
            }
            "server_name" => {
                require_arity(arg, statement, 2)?;
                server.host = statement[1].clone();
            }
            "ssl_certificate" => {
                require_arity(arg, statement, 2)?;
                server.certificate = clean(&statement[1], PathKind::DirFile, wd);
            }
            "ssl_certificate_key" => {
                require_arity(arg, statement, 2)?;
                server.private_key = clean(&statement[1], PathKind::DirFile, wd);
            }
            "return" => parse_return(statement, server)?,
            "ssl_protocols" | "ssl_ciphers" | "ssl_session_timeout" => {
                // Accepted and ignored per §4.2.
            }
            other => {
                return Err(ConfigError::UnknownDirective {
                    directive: other.to_string(),
                    context: "server",
                })
            }
        }
        Ok(())
    }

    fn parse_location_statement(&mut self, statement: &[String]) -> Result<(), ConfigError> {
        let loc = self
            .current_location
            .as_mut()
            .expect("location statements only parsed inside a location block");
        let arg = statement[0].as_str();
        let wd = self.working_directory.as_str();

        match arg {
            "index" => {
                require_arity(arg, statement, 2)?;
                loc.index = clean(&statement[1], PathKind::FileUri, wd);
            }
            "root" => {
                require_arity(arg, statement, 2)?;
                loc.root = clean(&statement[1], PathKind::DirOnly, wd);
            }
            "try_files" => {
                if statement.len() < 3 {
                    return Err(ConfigError::MalformedDirective {
                        directive: "try_files",
                        detail: "expects at least one candidate and a fallback".to_string(),
                    });
                }
                let last = statement.len() - 1;
                for candidate in &statement[1..last] {
                    let expanded = candidate.replace("$uri", &loc.uri);
                    loc.try_files_args
                        .push(clean(&expanded, PathKind::FileUri, wd));
                }
                let fallback = &statement[last];
                loc.try_files_fallback = if fallback.starts_with('=') {
                    fallback.clone()
                } else {
                    clean(fallback, PathKind::FileUri, wd)
                };
            }
            other => {
                return Err(ConfigError::UnknownDirective {
                    directive: other.to_string(),
                    context: "location",
                })
            }
        }
        Ok(())
    }
}

fn expect_size(directive: &'static str, actual: usize, expected: usize) -> Result<(), ConfigError> {
    if actual != expected {
        return Err(ConfigError::MalformedBlock {
            context: directive,
            actual,
            expected,
        });
    }
    Ok(())
}

fn require_arity(directive: &str, statement: &[String], expected: usize) -> Result<(), ConfigError> {
    if statement.len() != expected {
        return Err(ConfigError::MalformedDirective {
            directive: leak_name(directive),
            detail: format!("expected {} arg(s), got {}", expected - 1, statement.len() - 1),
        });
    }
    Ok(())
}

/// Directive names passed through this parser are a small fixed set of
/// `&'static str` literals matched just above; interning them back to
/// `&'static str` for the error type avoids an owned-string error variant.
fn leak_name(name: &str) -> &'static str {
    match name {
        "index" => "index",
        "root" => "root",
        "server_name" => "server_name",
        "ssl_certificate" => "ssl_certificate",
        "ssl_certificate_key" => "ssl_certificate_key",
        _ => "directive",
    }
}

fn parse_return(statement: &[String], server: &mut ServerConfig) -> Result<(), ConfigError> {
    match statement.len() {
        2 => {
            if let Ok(code) = statement[1].parse::<u16>() {
                if (100..=599).contains(&code) {
                    server.ret = code;
                    server.ret_val.clear();
                    return Ok(());
                }
            }
            // Single-argument shorthand: `return <url>;` defaults to 302.
            server.ret = 302;
            server.ret_val = statement[1].clone();
            Ok(())
        }
        3 => {
            let code = statement[1]
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidReturnCode(statement[1].clone()))?;
            if !(100..=599).contains(&code) {
                return Err(ConfigError::InvalidReturnCode(statement[1].clone()));
            }
            server.ret = code;
            server.ret_val = statement[2].clone();
            Ok(())
        }
        _ => Err(ConfigError::MalformedDirective {
            directive: "return",
            detail: format!("expected 1-2 args, got {}", statement.len() - 1),
        }),
    }
}

fn inherit_location_fields(server: &mut ServerConfig) {
    let root = server.root.clone();
    let index = server.index.clone();
    for slot in server.locations.iter_mut() {
        for loc in slot.iter_mut() {
            if loc.root.is_empty() {
                loc.root = root.clone();
            }
            if loc.index.is_empty() {
                loc.index = index.clone();
            }
        }
    }
}

fn strip_quotes(token: &str) -> String {
    let bytes = token.as_bytes();
    if bytes.len() >= 2 {
        token[1..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}
