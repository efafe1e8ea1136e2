use crate::constants::TEST_NOTIFICATION_SUBJECT;
use crate::CourseAttributes;
use crate::WatchRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub subject: String,
    pub body: String,
}

/// Seat-available message for `watch`, filled from the snapshot that
/// resolved it.
pub fn seat_available_message(
    subject: &str,
    watch: &WatchRequest,
    course: &CourseAttributes,
) -> NotificationMessage {
    let body = format!(
        "Hi {name},\n\n\
         A seat just opened up in a class you are watching:\n\n\
         {subject_code} {course_number} - {title}\n\
         CRN: {key}\n\
         Days: {days}\n\
         Time: {time}\n\
         Instructor: {instructor}\n\
         Available seats: {seats}\n\n\
         Quick! Register now before it fills up again.\n",
        name = watch.subscriber_name,
        subject_code = course.subject,
        course_number = course.course_number,
        title = course.title,
        key = watch.key,
        days = course.days,
        time = course.time,
        instructor = course.instructor,
        seats = course.available_seats,
    );

    NotificationMessage {
        subject: subject.to_string(),
        body,
    }
}

/// Fixed message used to check the delivery configuration end to end
pub fn test_message() -> NotificationMessage {
    NotificationMessage {
        subject: TEST_NOTIFICATION_SUBJECT.to_string(),
        body: "This is a test message from your seat watch service.\n\n\
               Notification delivery is configured correctly.\n"
            .to_string(),
    }
}
