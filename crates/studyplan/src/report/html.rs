use std::fmt::Write;

use chrono::NaiveDateTime;

use super::{escape_html, format_report_date};
use crate::model::{Priority, RoadmapStep, TrackedFile};

const STYLE: &str = r#"
      * { box-sizing: border-box; }
      body { margin: 0; padding: 40px 16px; background: #f8fafc; color: #0f172a;
             font-family: -apple-system, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
             -webkit-print-color-adjust: exact; print-color-adjust: exact; }
      .container { max-width: 896px; margin: 0 auto; }
      header { text-align: center; margin-bottom: 48px; padding-bottom: 32px; border-bottom: 1px solid #e2e8f0; }
      header h1 { font-size: 30px; margin: 0; }
      header p { color: #64748b; margin-top: 8px; }
      section { margin-bottom: 32px; break-inside: avoid; }
      .card { background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; overflow: hidden;
              box-shadow: 0 4px 6px rgba(15, 23, 42, 0.06); }
      .card-header { background: #f8fafc; padding: 16px; border-bottom: 1px solid #f1f5f9; }
      .card-header h3 { margin: 0; font-size: 18px; }
      .card-header p { margin: 4px 0 0; font-size: 12px; color: #64748b; }
      .card-body { padding: 24px; }
      h4 { font-size: 12px; text-transform: uppercase; letter-spacing: 0.05em; color: #64748b; margin: 0 0 8px; }
      .summary { background: #f8fafc; border: 1px solid #f1f5f9; border-radius: 8px; padding: 16px; line-height: 1.6; }
      .block { margin-top: 24px; }
      .tags { display: flex; flex-wrap: wrap; gap: 8px; }
      .tag { padding: 4px 12px; border: 1px solid #e2e8f0; border-radius: 9999px; font-size: 14px; background: #fff; }
      table { width: 100%; border-collapse: collapse; font-size: 14px; }
      th { text-align: left; background: #f8fafc; padding: 12px 16px; font-size: 12px; text-transform: uppercase; }
      td { padding: 12px 16px; border-top: 1px solid #f1f5f9; vertical-align: top; }
      .badge { display: inline-block; padding: 2px 8px; border-radius: 4px; font-size: 12px; font-weight: 600; border: 1px solid; }
      .priority-high { background: #fee2e2; color: #b91c1c; border-color: #fecaca; }
      .priority-medium { background: #fef3c7; color: #b45309; border-color: #fde68a; }
      .priority-low { background: #d1fae5; color: #047857; border-color: #a7f3d0; }
      .roadmap { background: #fff; border: 1px solid #e0e7ff; border-radius: 16px; padding: 32px; }
      .timeline { border-left: 2px solid #c7d2fe; margin-left: 20px; padding: 8px 0; }
      .step { position: relative; padding-left: 40px; margin-bottom: 32px; }
      .step:last-child { margin-bottom: 0; }
      .step::before { content: ""; position: absolute; left: -11px; top: 4px; width: 12px; height: 12px;
                      border-radius: 50%; background: #fff; border: 4px solid #4f46e5; }
      .step-box { background: #f8fafc; border: 1px solid #e2e8f0; border-radius: 12px; padding: 20px; }
      .step-name { font-size: 12px; font-weight: 700; text-transform: uppercase; color: #4f46e5;
                   background: #eef2ff; border: 1px solid #e0e7ff; border-radius: 4px; padding: 2px 8px; }
      .step-box h5 { font-size: 18px; margin: 12px 0 8px; }
      .high-priority { background: #fff1f2; border: 1px solid #fecdd3; border-radius: 16px; padding: 24px; }
      .high-priority h3 { color: #9f1239; margin-top: 0; }
      .high-priority ul { display: grid; grid-template-columns: repeat(auto-fill, minmax(240px, 1fr));
                          gap: 12px; list-style: none; padding: 0; }
      .high-priority li { background: #fff; border: 1px solid #ffe4e6; border-radius: 8px; padding: 12px; color: #881337; font-weight: 500; }
      .all-topics { background: #0f172a; color: #f1f5f9; border-radius: 16px; padding: 32px; }
      .all-topics h3 { margin-top: 0; }
      .all-topics .tag { background: #1e293b; border-color: #334155; color: #cbd5e1; border-radius: 4px; }
      footer { margin-top: 64px; padding-top: 32px; border-top: 1px solid #e2e8f0; text-align: center; color: #94a3b8; font-size: 14px; }
      @media print { body { background: #fff; padding: 0; } footer { display: none; } }
"#;

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "priority-high",
        Priority::Medium => "priority-medium",
        Priority::Low => "priority-low",
    }
}

fn write_tags(output: &mut String, tags: &[String]) {
    let _ = writeln!(output, r#"<div class="tags">"#);
    for tag in tags {
        let _ = writeln!(output, r#"<span class="tag">{}</span>"#, escape_html(tag));
    }
    let _ = writeln!(output, "</div>");
}

fn write_file_card(output: &mut String, file: &TrackedFile) {
    let Some(result) = file.result.as_ref().filter(|_| file.is_completed()) else {
        return;
    };

    let _ = writeln!(output, r#"<section class="card">"#);
    let _ = writeln!(output, r#"<div class="card-header">"#);
    let _ = writeln!(output, "<h3>{}</h3>", escape_html(&file.file_name));
    let _ = writeln!(
        output,
        "<p>Dosya Boyutu: {:.2} MB</p>",
        file.size_in_mb()
    );
    let _ = writeln!(output, "</div>");

    let _ = writeln!(output, r#"<div class="card-body">"#);
    let _ = writeln!(output, "<h4>Özet</h4>");
    let _ = writeln!(
        output,
        r#"<p class="summary">{}</p>"#,
        escape_html(&result.summary)
    );

    let _ = writeln!(output, r#"<div class="block">"#);
    let _ = writeln!(output, "<h4>Ana Konular</h4>");
    write_tags(output, &result.topics);
    let _ = writeln!(output, "</div>");

    let _ = writeln!(output, r#"<div class="block">"#);
    let _ = writeln!(output, "<h4>Çalışma Planı</h4>");
    let _ = writeln!(output, "<table>");
    let _ = writeln!(
        output,
        "<thead><tr><th>Konu</th><th>Yapılacaklar</th><th>Öncelik</th></tr></thead>"
    );
    let _ = writeln!(output, "<tbody>");
    for item in &result.study_plan {
        let _ = writeln!(
            output,
            r#"<tr><td><strong>{}</strong></td><td>{}</td><td><span class="badge {}">{}</span></td></tr>"#,
            escape_html(&item.topic),
            escape_html(&item.action),
            priority_class(item.priority),
            escape_html(item.priority.label())
        );
    }
    let _ = writeln!(output, "</tbody>");
    let _ = writeln!(output, "</table>");
    let _ = writeln!(output, "</div>");

    let _ = writeln!(output, "</div>");
    let _ = writeln!(output, "</section>");
}

fn write_roadmap(output: &mut String, roadmap: &[RoadmapStep]) {
    if roadmap.is_empty() {
        return;
    }

    let _ = writeln!(output, r#"<section class="roadmap">"#);
    let _ = writeln!(output, "<h3>Kişiselleştirilmiş Yol Haritası</h3>");
    let _ = writeln!(output, r#"<div class="timeline">"#);
    for step in roadmap {
        let _ = writeln!(output, r#"<div class="step"><div class="step-box">"#);
        let _ = writeln!(
            output,
            r#"<span class="step-name">{}</span>"#,
            escape_html(&step.step_name)
        );
        let _ = writeln!(output, "<h5>{}</h5>", escape_html(&step.title));
        let _ = writeln!(output, "<p>{}</p>", escape_html(&step.description));
        let _ = writeln!(output, "<h4>Konular</h4>");
        write_tags(output, &step.topics);
        let _ = writeln!(output, "</div></div>");
    }
    let _ = writeln!(output, "</div>");
    let _ = writeln!(output, "</section>");
}

fn write_high_priority(output: &mut String, topics: &[String]) {
    if topics.is_empty() {
        return;
    }

    let _ = writeln!(output, r#"<section class="high-priority">"#);
    let _ = writeln!(output, "<h3>Kesin Çalışman Gerekenler</h3>");
    let _ = writeln!(
        output,
        "<p>Bu liste, yüklediğiniz tüm dökümanlardan çıkarılan <strong>Yüksek Öncelikli</strong> konuları içerir.</p>"
    );
    let _ = writeln!(output, "<ul>");
    for topic in topics {
        let _ = writeln!(output, "<li>{}</li>", escape_html(topic));
    }
    let _ = writeln!(output, "</ul>");
    let _ = writeln!(output, "</section>");
}

fn write_all_topics(output: &mut String, topics: &[String]) {
    if topics.is_empty() {
        return;
    }

    let _ = writeln!(output, r#"<section class="all-topics">"#);
    let _ = writeln!(output, "<h3>Tüm Konu Başlıkları</h3>");
    write_tags(output, topics);
    let _ = writeln!(output, "</section>");
}

/// Renders a standalone HTML document. Only completed files get a card;
/// empty roadmap and topic lists leave their sections out.
pub fn render(
    files: &[TrackedFile],
    all_topics: &[String],
    high_priority_topics: &[String],
    roadmap: &[RoadmapStep],
    generated_at: NaiveDateTime,
) -> String {
    let date = escape_html(&format_report_date(generated_at));
    let mut output = String::new();

    let _ = writeln!(output, "<!DOCTYPE html>");
    let _ = writeln!(output, r#"<html lang="tr">"#);
    let _ = writeln!(output, "<head>");
    let _ = writeln!(output, r#"<meta charset="UTF-8" />"#);
    let _ = writeln!(
        output,
        r#"<meta name="viewport" content="width=device-width, initial-scale=1.0" />"#
    );
    let _ = writeln!(output, "<title>Çalışma Raporu - {}</title>", date);
    let _ = writeln!(output, "<style>{}</style>", STYLE);
    let _ = writeln!(output, "</head>");
    let _ = writeln!(output, "<body>");
    let _ = writeln!(output, r#"<div class="container">"#);

    let _ = writeln!(output, "<header>");
    let _ = writeln!(output, "<h1>Kişiselleştirilmiş Çalışma Raporu</h1>");
    let _ = writeln!(output, "<p>Oluşturulma Tarihi: {}</p>", date);
    let _ = writeln!(output, "</header>");

    let _ = writeln!(output, "<main>");
    for file in files {
        write_file_card(&mut output, file);
    }
    write_roadmap(&mut output, roadmap);
    write_high_priority(&mut output, high_priority_topics);
    write_all_topics(&mut output, all_topics);
    let _ = writeln!(output, "</main>");

    let _ = writeln!(output, "<footer>");
    let _ = writeln!(
        output,
        "<p>Bu rapor Yapay Zeka Destekli Çalışma Asistanı tarafından oluşturulmuştur.</p>"
    );
    let _ = writeln!(output, "</footer>");

    let _ = writeln!(output, "</div>");
    let _ = writeln!(output, "</body>");
    let _ = writeln!(output, "</html>");
    output
}
