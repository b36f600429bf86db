//! The typed server-model tree the parser builds (§3).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerType {
    HttpServer,
    HttpsServer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    ExactMatch,
    PrefixStop,
    RegexMatch,
    NoModifier,
}

impl Modifier {
    /// Index into `ServerConfig::locations`, matching the original's
    /// `LocationBlock::ModifierType` enum ordinals.
    pub fn slot(self) -> usize {
        match self {
            Modifier::ExactMatch => 0,
            Modifier::PrefixStop => 1,
            Modifier::RegexMatch => 2,
            Modifier::NoModifier => 3,
        }
    }

    pub fn from_token(tok: &str) -> Option<(Modifier, bool)> {
        match tok {
            "=" => Some((Modifier::ExactMatch, false)),
            "^~" => Some((Modifier::PrefixStop, false)),
            "~" => Some((Modifier::RegexMatch, true)),
            "~*" => Some((Modifier::RegexMatch, false)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocationBlock {
    pub modifier: Modifier,
    pub regex_case_sensitive: bool,
    pub uri: String,
    pub root: String,
    pub index: String,
    pub try_files_args: Vec<String>,
    pub try_files_fallback: String,
}

impl LocationBlock {
    pub fn new(uri: String, modifier: Modifier, regex_case_sensitive: bool) -> Self {
        LocationBlock {
            modifier,
            regex_case_sensitive,
            uri,
            root: String::new(),
            index: String::new(),
            try_files_args: Vec::new(),
            try_files_fallback: String::new(),
        }
    }

    pub fn has_try_files(&self) -> bool {
        !self.try_files_args.is_empty() || !self.try_files_fallback.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_type: ServerType,
    pub port: u16,
    pub host: String,
    pub root: String,
    pub index: String,
    pub ret: u16,
    pub ret_val: String,
    pub certificate: String,
    pub private_key: String,
    /// Indexed by `Modifier::slot()`: [ExactMatch, PrefixStop, RegexMatch, NoModifier]
    pub locations: [Vec<LocationBlock>; 4],
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            server_type: ServerType::HttpServer,
            port: 80,
            host: String::new(),
            root: "html/".to_string(),
            index: "index.html".to_string(),
            ret: 0,
            ret_val: String::new(),
            certificate: String::new(),
            private_key: String::new(),
            locations: Default::default(),
        }
    }
}

impl ServerConfig {
    pub fn locations_for(&self, modifier: Modifier) -> &[LocationBlock] {
        &self.locations[modifier.slot()]
    }

    pub fn push_location(&mut self, modifier: Modifier, block: LocationBlock) {
        self.locations[modifier.slot()].push(block);
    }

    /// §3 invariants, checked at the end of a `server {}` block.
    pub fn validate(&self) -> Result<(), &'static str> {
        let has_static = !self.root.is_empty() && !self.index.is_empty();
        if !has_static && self.ret == 0 {
            return Err("server block must set root+index or return");
        }

        match self.server_type {
            ServerType::HttpsServer => {
                if self.certificate.is_empty() || self.private_key.is_empty() {
                    return Err("https server requires both ssl_certificate and ssl_certificate_key");
                }
            }
            ServerType::HttpServer => {
                if !self.certificate.is_empty() || !self.private_key.is_empty() {
                    return Err("http server must not set ssl_certificate/ssl_certificate_key");
                }
            }
        }

        if self.ret != 0 && self.ret / 100 == 3 {
            if !matches!(self.ret, 301 | 302 | 303 | 307 | 308) {
                return Err("redirect return code must be one of 301,302,303,307,308");
            }
            if self.ret_val.is_empty() {
                return Err("redirect return requires a value");
            }
            if self.ret_val.contains("$host") && self.host.is_empty() {
                return Err("redirect value references $host but server_name is unset");
            }
        }

        Ok(())
    }
}
