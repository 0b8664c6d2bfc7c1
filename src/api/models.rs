//! Graph resources as they arrive on the wire and the trimmed views handed back to callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    #[serde(default)]
    pub email_address: Option<EmailAddress>,
}

impl Recipient {
    fn address(&self) -> Option<String> {
        self.email_address.as_ref()?.address.clone()
    }

    fn name(&self) -> Option<String> {
        self.email_address.as_ref()?.name.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTimeTimeZone {
    #[serde(default)]
    pub date_time: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphCalendar {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<EmailAddress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSummary {
    pub id: String,
    pub name: Option<String>,
    pub owner: Option<String>,
}

impl From<GraphCalendar> for CalendarSummary {
    fn from(calendar: GraphCalendar) -> Self {
        Self {
            id: calendar.id,
            name: calendar.name,
            owner: calendar.owner.and_then(|owner| owner.name),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphLocation {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub coordinates: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseStatus {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphAttendee {
    #[serde(default)]
    pub email_address: Option<EmailAddress>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeeting {
    #[serde(default)]
    pub join_url: Option<String>,
    #[serde(default)]
    pub conference_id: Option<String>,
    #[serde(default)]
    pub toll_number: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEvent {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<ItemBody>,
    #[serde(default)]
    pub start: Option<DateTimeTimeZone>,
    #[serde(default)]
    pub end: Option<DateTimeTimeZone>,
    #[serde(default)]
    pub is_all_day: Option<bool>,
    #[serde(default)]
    pub location: Option<GraphLocation>,
    #[serde(default)]
    pub organizer: Option<Recipient>,
    #[serde(default)]
    pub attendees: Option<Vec<GraphAttendee>>,
    #[serde(default)]
    pub is_online_meeting: Option<bool>,
    #[serde(default)]
    pub online_meeting_provider: Option<String>,
    #[serde(default)]
    pub online_meeting: Option<OnlineMeeting>,
    #[serde(default)]
    pub importance: Option<String>,
    #[serde(default)]
    pub sensitivity: Option<String>,
    #[serde(default)]
    pub show_as: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub recurrence: Option<Value>,
    #[serde(default)]
    pub reminder_minutes_before_start: Option<i64>,
    #[serde(default)]
    pub is_reminder_on: Option<bool>,
    #[serde(default)]
    pub response_status: Option<ResponseStatus>,
    #[serde(default)]
    pub is_cancelled: Option<bool>,
    #[serde(default)]
    pub created_date_time: Option<String>,
    #[serde(default)]
    pub last_modified_date_time: Option<String>,
    #[serde(default)]
    pub change_key: Option<String>,
    #[serde(default)]
    pub series_master_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub subject: Option<String>,
    pub start: Option<DateTimeTimeZone>,
    pub end: Option<DateTimeTimeZone>,
    pub organizer: Option<String>,
    pub location: Option<String>,
    pub attendees: Vec<String>,
}

impl From<GraphEvent> for EventSummary {
    fn from(event: GraphEvent) -> Self {
        Self {
            id: event.id,
            subject: event.subject,
            start: event.start,
            end: event.end,
            organizer: event.organizer.as_ref().and_then(Recipient::address),
            location: event.location.and_then(|location| location.display_name),
            attendees: event
                .attendees
                .unwrap_or_default()
                .into_iter()
                .filter_map(|attendee| attendee.email_address?.address)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: String,
    pub subject: Option<String>,
    pub body: ItemBody,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
    pub is_all_day: bool,
    pub location: LocationView,
    pub organizer: PersonView,
    pub attendees: Vec<AttendeeView>,
    pub is_online_meeting: bool,
    pub online_meeting: Option<OnlineMeetingView>,
    pub importance: Option<String>,
    pub sensitivity: Option<String>,
    pub show_as: Option<String>,
    pub categories: Vec<String>,
    pub recurrence: Option<Value>,
    pub reminder_minutes_before_start: Option<i64>,
    pub is_reminder_on: Option<bool>,
    pub response_status: ResponseView,
    pub is_cancelled: bool,
    pub created_date_time: Option<String>,
    pub last_modified_date_time: Option<String>,
    pub change_key: Option<String>,
    pub series_master_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationView {
    pub display_name: Option<String>,
    pub address: Option<Value>,
    pub coordinates: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonView {
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendeeView {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub response: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineMeetingView {
    pub join_url: Option<String>,
    pub conference_id: Option<String>,
    pub provider: Option<String>,
    pub toll_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseView {
    pub response: Option<String>,
    pub time: Option<String>,
}

impl From<GraphEvent> for EventDetails {
    fn from(event: GraphEvent) -> Self {
        let is_online_meeting = event.is_online_meeting.unwrap_or(false);
        let location = event.location.unwrap_or_default();
        let response_status = event.response_status.unwrap_or_default();
        let organizer = event.organizer.unwrap_or_default();
        let online_meeting = if is_online_meeting {
            let meeting = event.online_meeting.unwrap_or_default();
            Some(OnlineMeetingView {
                join_url: meeting.join_url,
                conference_id: meeting.conference_id,
                provider: event.online_meeting_provider,
                toll_number: meeting.toll_number,
            })
        } else {
            None
        };

        Self {
            id: event.id,
            subject: event.subject,
            body: event.body.unwrap_or_default(),
            start: event.start.unwrap_or_default(),
            end: event.end.unwrap_or_default(),
            is_all_day: event.is_all_day.unwrap_or(false),
            location: LocationView {
                display_name: location.display_name,
                address: location.address,
                coordinates: location.coordinates,
            },
            organizer: PersonView {
                name: organizer.name(),
                email: organizer.address(),
            },
            attendees: event
                .attendees
                .unwrap_or_default()
                .into_iter()
                .map(|attendee| {
                    let email = attendee.email_address.unwrap_or_default();
                    let status = attendee.status.unwrap_or_default();
                    AttendeeView {
                        name: email.name,
                        email: email.address,
                        kind: attendee.kind,
                        response: status.response,
                        time: status.time,
                    }
                })
                .collect(),
            is_online_meeting,
            online_meeting,
            importance: event.importance,
            sensitivity: event.sensitivity,
            show_as: event.show_as,
            categories: event.categories.unwrap_or_default(),
            recurrence: event.recurrence,
            reminder_minutes_before_start: event.reminder_minutes_before_start,
            is_reminder_on: event.is_reminder_on,
            response_status: ResponseView {
                response: response_status.response,
                time: response_status.time,
            },
            is_cancelled: event.is_cancelled.unwrap_or(false),
            created_date_time: event.created_date_time,
            last_modified_date_time: event.last_modified_date_time,
            change_key: event.change_key,
            series_master_id: event.series_master_id,
            kind: event.kind,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub email_addresses: Option<Vec<EmailAddress>>,
    #[serde(default)]
    pub business_phones: Option<Vec<String>>,
    #[serde(default)]
    pub mobile_phone: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMessage {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body_preview: Option<String>,
    #[serde(default)]
    pub created_date_time: Option<String>,
    #[serde(default)]
    pub last_modified_date_time: Option<String>,
    #[serde(default)]
    pub to_recipients: Option<Vec<Recipient>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSummary {
    pub id: String,
    pub subject: Option<String>,
    pub body_preview: Option<String>,
    pub created_date_time: Option<String>,
    pub last_modified_date_time: Option<String>,
    pub to_recipients: Vec<String>,
}

impl From<GraphMessage> for DraftSummary {
    fn from(message: GraphMessage) -> Self {
        Self {
            id: message.id,
            subject: message.subject,
            body_preview: message.body_preview,
            created_date_time: message.created_date_time,
            last_modified_date_time: message.last_modified_date_time,
            to_recipients: message
                .to_recipients
                .unwrap_or_default()
                .iter()
                .filter_map(Recipient::address)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFolder {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub parent_folder_id: Option<String>,
    #[serde(default)]
    pub child_folder_count: Option<u64>,
    #[serde(default)]
    pub unread_item_count: Option<u64>,
    #[serde(default)]
    pub total_item_count: Option<u64>,
    #[serde(default)]
    pub is_hidden: Option<bool>,
    /// Filled in by the tree fetch; never sent by Graph on a plain list.
    #[serde(default)]
    pub child_folders: Vec<MailFolder>,
}
