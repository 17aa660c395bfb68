use axum::{http::StatusCode, response::Html};

/// A fixed frontend page.
pub struct Page {
    pub path: &'static str,
    pub title: &'static str,
    pub heading: &'static str,
    pub body: &'static str,
}

pub const HOME: Page = Page {
    path: "/",
    title: "Trang chủ",
    heading: "Nền tảng đồng sở hữu xe điện",
    body: "Quản lý xe, chia sẻ chi phí và đặt lịch sử dụng cùng các thành viên trong nhóm.",
};

pub const BOOKING: Page = Page {
    path: "/booking",
    title: "Đặt lịch",
    heading: "Đặt lịch sử dụng xe",
    body: "Chọn khung giờ bạn muốn sử dụng xe. Lịch đặt sẽ được hiển thị tại đây.",
};

pub const COST: Page = Page {
    path: "/cost",
    title: "Chi phí",
    heading: "Chia sẻ chi phí",
    body: "Tổng hợp chi phí sạc điện, bảo dưỡng và bảo hiểm của nhóm.",
};

pub const GROUP: Page = Page {
    path: "/group",
    title: "Nhóm",
    heading: "Nhóm đồng sở hữu",
    body: "Danh sách thành viên và quy định chung của nhóm.",
};

pub const VEHICLE: Page = Page {
    path: "/vehicle",
    title: "Xe",
    heading: "Thông tin xe",
    body: "Thông tin chi tiết về xe và lịch bảo dưỡng.",
};

pub const NOT_FOUND: Page = Page {
    path: "/404",
    title: "Không tìm thấy",
    heading: "404 - Không tìm thấy trang",
    body: "Trang bạn yêu cầu không tồn tại.",
};

/// Pages listed in the navigation bar, in display order.
pub const NAVIGATION: [&Page; 5] = [&HOME, &BOOKING, &COST, &GROUP, &VEHICLE];

pub fn render(page: &Page) -> String {
    let nav: String = NAVIGATION
        .iter()
        .map(|p| format!(r#"<a href="{}">{}</a>"#, p.path, p.title))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"<!DOCTYPE html>
<html lang="vi">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | EV Co-ownership</title>
</head>
<body>
<nav>{nav}</nav>
<main>
<h1>{heading}</h1>
<p>{body}</p>
</main>
</body>
</html>
"#,
        title = page.title,
        nav = nav,
        heading = page.heading,
        body = page.body,
    )
}

pub async fn home_page() -> Html<String> {
    Html(render(&HOME))
}

pub async fn booking_page() -> Html<String> {
    Html(render(&BOOKING))
}

pub async fn cost_page() -> Html<String> {
    Html(render(&COST))
}

pub async fn group_page() -> Html<String> {
    Html(render(&GROUP))
}

pub async fn vehicle_page() -> Html<String> {
    Html(render(&VEHICLE))
}

pub async fn page_not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(render(&NOT_FOUND)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_links_every_navigable_page() {
        let html = render(&GROUP);
        for page in NAVIGATION {
            assert!(html.contains(&format!(r#"href="{}""#, page.path)));
        }
        assert!(html.contains("<h1>Nhóm đồng sở hữu</h1>"));
        assert!(html.contains(r#"<html lang="vi">"#));
    }
}
