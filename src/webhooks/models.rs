use serde::{de::IgnoredAny, Deserialize};

/// The kinds of GitHub webhook events that can have a handler
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    IssueComment,
    Ping,
}

impl EventKind {
    /// Lookup a kind by its `X-GitHub-Event` name
    pub fn from_name(name: &str) -> Option<EventKind> {
        match name {
            "issue_comment" => Some(EventKind::IssueComment),
            "ping" => Some(EventKind::Ping),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::IssueComment => "issue_comment",
            EventKind::Ping => "ping",
        }
    }
}

/// The overarching GitHub webhook types
#[derive(Debug)]
pub enum Event {
    IssueComment(IssueComment),
    Ping(Ping),
    Unsupported { kind: String },
}

impl Event {
    /// Parse a payload according to the event name it was delivered with.
    /// Unsupported events must still be valid JSON.
    pub fn parse(name: &str, body: &[u8]) -> serde_json::Result<Event> {
        let event = match EventKind::from_name(name) {
            Some(EventKind::IssueComment) => Event::IssueComment(serde_json::from_slice(body)?),
            Some(EventKind::Ping) => Event::Ping(serde_json::from_slice(body)?),
            None => {
                serde_json::from_slice::<IgnoredAny>(body)?;
                Event::Unsupported {
                    kind: name.to_owned(),
                }
            }
        };
        Ok(event)
    }

    /// The kind of the event, if it is one that can be handled
    pub fn kind(&self) -> Option<EventKind> {
        match self {
            Self::IssueComment(_) => Some(EventKind::IssueComment),
            Self::Ping(_) => Some(EventKind::Ping),
            Self::Unsupported { .. } => None,
        }
    }

    /// Get the name of the webhook being executed
    pub fn name(&self) -> &str {
        match self {
            Self::Unsupported { kind } => kind,
            _ => self.kind().map(|k| k.name()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Ping {
    pub zen: String,
    pub hook_id: i64,
}

/// A comment was created, edited or deleted on an issue or pull request
#[derive(Debug, Deserialize)]
pub struct IssueComment {
    pub action: String,
    pub comment: Comment,
    pub issue: Issue,
    pub repository: Repository,
    /// Only present when delivered to an app
    #[serde(default)]
    pub installation: Option<Installation>,
}

#[derive(Debug, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub number: u64,
}

/// The repository information
#[derive(Clone, Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: User,
}

#[derive(Clone, Debug, Deserialize)]
pub struct User {
    pub login: String,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Installation {
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::{Event, EventKind};
    use std::fs;

    fn read(name: &str) -> Vec<u8> {
        fs::read(format!("testdata/webhooks/{}", name))
            .unwrap_or_else(|_| panic!("failed to read {} test data", name))
    }

    #[test]
    fn parse_issue_comment() {
        let parsed =
            Event::parse("issue_comment", &read("issue-comment-ping.json")).expect("invalid JSON format");

        assert_eq!("issue_comment", parsed.name());
        assert_eq!(Some(EventKind::IssueComment), parsed.kind());
        if let Event::IssueComment(event) = parsed {
            assert_eq!("created", &event.action);
            assert_eq!(492700400, event.comment.id);
            assert_eq!("ping", &event.comment.body);
            assert_eq!(1, event.issue.number);
            assert_eq!("Hello-World", &event.repository.name);
            assert_eq!("Codertocat", &event.repository.owner.login);
            assert_eq!(2311213, event.installation.unwrap().id);
        }
    }

    #[test]
    fn parse_github_ping() {
        let parsed = Event::parse("ping", &read("github-ping.json")).expect("invalid JSON format");

        assert_eq!("ping", parsed.name());
        if let Event::Ping(ping) = parsed {
            assert_eq!("Non-blocking is better than blocking.", &ping.zen);
            assert_eq!(30, ping.hook_id);
        }
    }

    #[test]
    fn parse_unsupported() {
        let parsed = Event::parse("push", &read("push.json")).expect("invalid JSON format");

        assert_eq!("push", parsed.name());
        assert_eq!(None, parsed.kind());
    }

    #[test]
    fn parse_mismatched_kind() {
        assert!(Event::parse("issue_comment", &read("github-ping.json")).is_err());
    }

    #[test]
    fn parse_malformed() {
        assert!(Event::parse("issue_comment", b"{\"action\":").is_err());
        assert!(Event::parse("push", b"not json").is_err());
    }
}
