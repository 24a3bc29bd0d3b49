use anyhow::anyhow;
use async_trait::async_trait;
use model::build::LogLocation;
use rusoto_logs::{CloudWatchLogs, GetLogEventsRequest};

use super::{BuildLogReader, BuildLogsError};

pub struct BuildLogReaderImpl<L: CloudWatchLogs + Sync + Send> {
    logs_client: L,
}

impl<L: CloudWatchLogs + Sync + Send> BuildLogReaderImpl<L> {
    pub fn new(logs_client: L) -> Self {
        Self { logs_client }
    }
}

#[async_trait]
impl<L: CloudWatchLogs + Sync + Send> BuildLogReader for BuildLogReaderImpl<L> {
    async fn tail(
        &self,
        location: LogLocation,
        max_lines: usize,
    ) -> Result<Vec<String>, BuildLogsError> {
        let (log_group_name, log_stream_name) = match (location.group_name, location.stream_name)
        {
            (Some(group), Some(stream)) => (group, stream),
            _ => {
                return Err(BuildLogsError::MissingLocation(
                    "build has no log group or stream".to_owned(),
                ))
            }
        };

        if max_lines == 0 {
            return Ok(vec![]);
        }

        // Without start_from_head the newest events are returned.
        let request = GetLogEventsRequest {
            log_group_name: log_group_name.clone(),
            log_stream_name: log_stream_name.clone(),
            limit: Some(max_lines as i64),
            start_from_head: Some(false),
            ..Default::default()
        };

        let events = self
            .logs_client
            .get_log_events(request)
            .await
            .map_err(|e| {
                BuildLogsError::Unknown(anyhow!(e).context(format!(
                    "Error reading log stream {log_group_name}/{log_stream_name}"
                )))
            })?
            .events
            .unwrap_or_default();

        Ok(last_lines(
            events.into_iter().filter_map(|event| event.message),
            max_lines,
        ))
    }
}

fn last_lines(messages: impl Iterator<Item = String>, max_lines: usize) -> Vec<String> {
    let lines: Vec<String> = messages
        .map(|message| message.trim_end_matches(['\r', '\n']).to_owned())
        .collect();

    let skip = lines.len().saturating_sub(max_lines);
    lines.into_iter().skip(skip).collect()
}
