use super::{Link, DEFAULT_MAX_PAYLOAD};
use crate::error::{api_codes, Result, SubstrateError};
use crate::log::{
    DiscardPolicy, LogSubstrate, MessageQuery, PublishAck, StoredMessage, StreamConfig,
    StreamInfo, StreamState, SubjectState,
};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use subjectstore_core::subject::{is_pattern, subject_matches};
use subjectstore_core::Timestamp;
use tracing::debug;

const MAXIMUM_MESSAGES_EXCEEDED: u16 = 10077;
const MAXIMUM_BYTES_EXCEEDED: u16 = 10078;

struct Stream {
    config: StreamConfig,
    created: Timestamp,
    messages: BTreeMap<u64, StoredMessage>,
    last_seq: u64,
    bytes: u64,
}

impl Stream {
    fn new(config: StreamConfig) -> Self {
        Stream {
            config,
            created: Timestamp::now(),
            messages: BTreeMap::new(),
            last_seq: 0,
            bytes: 0,
        }
    }

    fn captures(&self, subject: &str) -> bool {
        self.config
            .subjects
            .iter()
            .any(|pattern| subject_matches(pattern, subject))
    }

    fn remove(&mut self, sequence: u64) -> bool {
        match self.messages.remove(&sequence) {
            Some(msg) => {
                self.bytes -= msg.payload.len() as u64;
                true
            }
            None => false,
        }
    }

    fn expire(&mut self, now: Timestamp) {
        if self.config.max_age_secs == 0 {
            return;
        }
        let max_age = self.config.max_age_secs.saturating_mul(1_000_000);
        let expired: Vec<u64> = self
            .messages
            .values()
            .take_while(|msg| now.as_micros().saturating_sub(msg.time.as_micros()) > max_age)
            .map(|msg| msg.sequence)
            .collect();
        for seq in expired {
            self.remove(seq);
        }
    }

    fn append(&mut self, subject: &str, payload: Bytes) -> Result<u64> {
        let size = payload.len() as u64;
        let config = &self.config;
        if config.max_message_size > 0 && size > config.max_message_size {
            return Err(SubstrateError::MaxPayload {
                size: payload.len(),
                max: config.max_message_size as usize,
            });
        }
        if config.discard == DiscardPolicy::New {
            if config.max_messages > 0 && self.messages.len() as u64 >= config.max_messages {
                return Err(SubstrateError::api(
                    MAXIMUM_MESSAGES_EXCEEDED,
                    "maximum messages exceeded",
                ));
            }
            if config.max_bytes > 0 && self.bytes + size > config.max_bytes {
                return Err(SubstrateError::api(
                    MAXIMUM_BYTES_EXCEEDED,
                    "maximum bytes exceeded",
                ));
            }
        }

        self.last_seq += 1;
        let sequence = self.last_seq;
        self.bytes += size;
        self.messages.insert(
            sequence,
            StoredMessage {
                subject: subject.to_string(),
                sequence,
                payload,
                time: Timestamp::now(),
            },
        );
        self.enforce_limits(subject);
        Ok(sequence)
    }

    fn enforce_limits(&mut self, subject: &str) {
        let per_subject = self.config.max_messages_per_subject;
        if per_subject > 0 {
            let on_subject: Vec<u64> = self
                .messages
                .values()
                .filter(|msg| msg.subject == subject)
                .map(|msg| msg.sequence)
                .collect();
            let excess = on_subject.len().saturating_sub(per_subject as usize);
            for seq in on_subject.into_iter().take(excess) {
                self.remove(seq);
            }
        }
        if self.config.discard == DiscardPolicy::Old {
            while self.config.max_messages > 0
                && self.messages.len() as u64 > self.config.max_messages
            {
                self.pop_oldest();
            }
            while self.config.max_bytes > 0 && self.bytes > self.config.max_bytes {
                if !self.pop_oldest() {
                    break;
                }
            }
        }
    }

    fn pop_oldest(&mut self) -> bool {
        match self.messages.keys().next().copied() {
            Some(seq) => self.remove(seq),
            None => false,
        }
    }

    fn info(&self, subjects_filter: Option<&str>) -> StreamInfo {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut live: Vec<SubjectState> = Vec::new();
        for msg in self.messages.values() {
            match positions.get(msg.subject.as_str()) {
                Some(&idx) => live[idx].messages += 1,
                None => {
                    positions.insert(&msg.subject, live.len());
                    live.push(SubjectState {
                        subject: msg.subject.clone(),
                        messages: 1,
                        first_seq: msg.sequence,
                    });
                }
            }
        }
        let num_subjects = live.len() as u64;
        let subjects = subjects_filter
            .map(|filter| {
                live.into_iter()
                    .filter(|s| subject_matches(filter, &s.subject))
                    .collect::<Vec<_>>()
            })
            .filter(|matched| !matched.is_empty());

        StreamInfo {
            config: self.config.clone(),
            created: self.created,
            state: StreamState {
                messages: self.messages.len() as u64,
                bytes: self.bytes,
                first_seq: self.messages.keys().next().copied().unwrap_or(0),
                last_seq: self.last_seq,
                num_subjects,
                subjects,
            },
        }
    }
}

/// In-memory log substrate
pub struct MemoryLog {
    streams: DashMap<String, Arc<RwLock<Stream>>>,
    link: Link,
}

impl MemoryLog {
    /// Log with the default 1 MiB max payload
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    /// Log with a custom max payload
    pub fn with_max_payload(max_payload: usize) -> Self {
        MemoryLog {
            streams: DashMap::new(),
            link: Link::new(max_payload),
        }
    }

    /// Simulate losing or regaining the connection
    pub fn set_online(&self, online: bool) {
        self.link.set_online(online);
    }

    /// Max payload accepted by publish and stream configs
    pub fn max_payload(&self) -> usize {
        self.link.max_payload()
    }

    /// Names of the registered streams, sorted
    pub fn stream_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.streams.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    fn stream(&self, name: &str) -> Result<Arc<RwLock<Stream>>> {
        self.streams
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| SubstrateError::api(api_codes::STREAM_NOT_FOUND, "stream not found"))
    }

    fn validate(&self, config: &mut StreamConfig) -> Result<()> {
        if config.name.is_empty() {
            return Err(SubstrateError::InvalidRequest(
                "stream name is required".to_string(),
            ));
        }
        if config
            .name
            .chars()
            .any(|c| c == '.' || c == '*' || c == '>' || c.is_whitespace())
        {
            return Err(SubstrateError::InvalidRequest(format!(
                "invalid stream name {:?}",
                config.name
            )));
        }
        let size = config.name.len() + config.subjects.iter().map(String::len).sum::<usize>();
        self.link.check_payload(size)?;
        if config.subjects.is_empty() {
            config.subjects.push(config.name.clone());
        }
        Ok(())
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LogSubstrate for MemoryLog {
    async fn create_stream(&self, mut config: StreamConfig) -> Result<StreamInfo> {
        self.link.check()?;
        self.validate(&mut config)?;
        let name = config.name.clone();
        let stream = self
            .streams
            .entry(name.clone())
            .or_insert_with(|| {
                debug!(stream = %name, subjects = ?config.subjects, "stream created");
                Arc::new(RwLock::new(Stream::new(config.clone())))
            })
            .value()
            .clone();
        let guard = stream.read();
        if guard.config != config {
            return Err(SubstrateError::api(
                api_codes::STREAM_NAME_IN_USE,
                "stream name already in use with a different configuration",
            ));
        }
        Ok(guard.info(None))
    }

    async fn update_stream(&self, mut config: StreamConfig) -> Result<StreamInfo> {
        self.link.check()?;
        self.validate(&mut config)?;
        let stream = self.stream(&config.name)?;
        let mut guard = stream.write();
        debug!(stream = %config.name, subjects = ?config.subjects, "stream updated");
        guard.config = config;
        Ok(guard.info(None))
    }

    async fn delete_stream(&self, name: &str) -> Result<bool> {
        self.link.check()?;
        match self.streams.remove(name) {
            Some(_) => {
                debug!(stream = %name, "stream deleted");
                Ok(true)
            }
            None => Err(SubstrateError::api(
                api_codes::STREAM_NOT_FOUND,
                "stream not found",
            )),
        }
    }

    async fn stream_info(&self, name: &str, subjects_filter: Option<&str>) -> Result<StreamInfo> {
        self.link.check()?;
        let stream = self.stream(name)?;
        let mut guard = stream.write();
        guard.expire(Timestamp::now());
        Ok(guard.info(subjects_filter))
    }

    async fn publish(&self, subject: &str, payload: Bytes) -> Result<PublishAck> {
        self.link.check()?;
        self.link.check_payload(payload.len())?;
        if subject.is_empty() || is_pattern(subject) {
            return Err(SubstrateError::InvalidRequest(format!(
                "cannot publish to subject {subject:?}"
            )));
        }
        let target = self
            .streams
            .iter()
            .find(|entry| entry.value().read().captures(subject))
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())));
        let (name, stream) = target.ok_or(SubstrateError::NoResponders)?;
        let sequence = stream.write().append(subject, payload)?;
        Ok(PublishAck {
            stream: name,
            sequence,
        })
    }

    async fn get_message(&self, stream: &str, query: MessageQuery) -> Result<StoredMessage> {
        self.link.check()?;
        let stream = self.stream(stream)?;
        let mut guard = stream.write();
        guard.expire(Timestamp::now());
        let found = match &query {
            MessageQuery::Sequence(seq) => guard.messages.get(seq),
            MessageQuery::LastBySubject(filter) => guard
                .messages
                .values()
                .rev()
                .find(|msg| subject_matches(filter, &msg.subject)),
        };
        found
            .cloned()
            .ok_or_else(|| SubstrateError::api(api_codes::NO_MESSAGE_FOUND, "no message found"))
    }

    async fn delete_message(&self, stream: &str, sequence: u64) -> Result<bool> {
        self.link.check()?;
        let stream = self.stream(stream)?;
        let mut guard = stream.write();
        if guard.config.deny_delete {
            return Ok(false);
        }
        Ok(guard.remove(sequence))
    }
}
