use hotsearch_classifier::Classifier;
use hotsearch_core::Category;

pub(crate) fn run_classify(titles: &[String]) {
    let classifier = Classifier::new();
    for (category, title) in classify_titles(&classifier, titles) {
        println!("{:<14}{title}", category.as_str());
    }
}

fn classify_titles<'a>(classifier: &Classifier, titles: &'a [String]) -> Vec<(Category, &'a str)> {
    titles
        .iter()
        .map(|title| (classifier.classify_title(title), title.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_title_gets_a_topic() {
        let classifier = Classifier::new();
        let titles = vec!["国足世界杯预选赛".to_string(), "zzzz".to_string()];

        let result = classify_titles(&classifier, &titles);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].1, "国足世界杯预选赛");
        assert!(result.iter().all(|(category, _)| category.is_topic()));
    }
}
