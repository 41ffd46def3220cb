mod notification;

pub use notification::{
    DispatchResult, NotificationRecord, NotificationRequest, PushMessage, SENT_MESSAGE,
};
