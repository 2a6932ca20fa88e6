//! Built-in string tables

pub(super) struct Strings {
    pub greeting: &'static str,
    pub duration_question: &'static str,
    pub severity_question: &'static str,
    pub follow_up_fever: &'static str,
    pub follow_up_cough: &'static str,
    pub follow_up_headache: &'static str,
    pub follow_up_fallback: &'static str,
    pub suggestion_intro: &'static str,
    pub remedy_medium: &'static str,
    pub remedy_default: &'static str,
    pub disclaimer: &'static str,
    pub photo_uploaded: &'static str,
    pub video_uploaded: &'static str,
    pub photo_received: &'static str,
    pub video_received: &'static str,
    pub consult_doctor: &'static str,
    pub step: &'static str,
    pub of: &'static str,
    pub duration_options: [&'static str; 3],
    pub severity_options: [&'static str; 3],
    pub yes_no: [&'static str; 2],
    /// Same order as `Symptom::COMMON`
    pub common_symptoms: [&'static str; 10],
}

pub(super) const EN: Strings = Strings {
    greeting: "Hello! I'd like to understand how you are feeling. Please tell me your problem.",
    duration_question: "How long have you had this problem?",
    severity_question: "Is the pain mild or strong?",
    follow_up_fever: "Do you also have a cough?",
    follow_up_cough: "Do you also have fever?",
    follow_up_headache: "Do you also have nausea?",
    follow_up_fallback: "Do you also have any other symptoms?",
    suggestion_intro: "Based on your symptoms, here are some suggestions:",
    remedy_medium: "• Drink warm water\n• Take rest\n• If fever increases, consult doctor immediately",
    remedy_default: "• Stay hydrated\n• Get proper rest\n• Consult doctor if symptoms persist",
    disclaimer: "This is not a medical diagnosis. Please consult a doctor for proper treatment.",
    photo_uploaded: "📷 Photo uploaded",
    video_uploaded: "🎥 Video uploaded",
    photo_received: "Photo received. Can you tell me more about this?",
    video_received: "Video received. Can you tell me more about this?",
    consult_doctor: "Talk to Doctor Now",
    step: "Step",
    of: "of",
    duration_options: ["Today", "2-3 days", "1 week+"],
    severity_options: ["Mild", "Moderate", "Severe"],
    yes_no: ["Yes", "No"],
    common_symptoms: [
        "Fever",
        "Cough",
        "Headache",
        "Body Pain",
        "Stomach Pain",
        "Rash",
        "Eye Problem",
        "Ear Problem",
        "Cold",
        "Sore Throat",
    ],
};

pub(super) const PA: Strings = Strings {
    greeting: "ਸਤ ਸ੍ਰੀ ਅਕਾਲ! ਮੈਂ ਤੁਹਾਡੀ ਸਿਹਤ ਬਾਰੇ ਜਾਣਕਾਰੀ ਲੈਣਾ ਚਾਹੁੰਦਾ ਹਾਂ। ਤੁਸੀਂ ਕਿਸ ਤਰ੍ਹਾਂ ਮਹਿਸੂਸ ਕਰ ਰਹੇ ਹੋ?",
    duration_question: "ਇਹ ਸਮੱਸਿਆ ਤੁਹਾਨੂੰ ਕਿੰਨੇ ਦਿਨ ਤੋਂ ਹੈ?",
    severity_question: "ਕੀ ਦਰਦ ਜ਼ਿਆਦਾ ਹੈ ਜਾਂ ਹਲਕਾ?",
    follow_up_fever: "ਕੀ ਤੁਹਾਨੂੰ ਖੰਘ ਵੀ ਹੈ?",
    follow_up_cough: "ਕੀ ਤੁਹਾਨੂੰ ਬੁਖਾਰ ਵੀ ਹੈ?",
    follow_up_headache: "ਕੀ ਤੁਹਾਨੂੰ ਮਤਲੀ ਵੀ ਹੈ?",
    follow_up_fallback: "ਕੀ ਤੁਹਾਨੂੰ ਕੋਈ ਹੋਰ ਲੱਛਣ ਵੀ ਹਨ?",
    suggestion_intro: "ਤੁਹਾਡੇ ਲੱਛਣਾਂ ਦੇ ਆਧਾਰ ਤੇ, ਇਹ ਸੁਝਾਅ ਹਨ:",
    remedy_medium: "• ਨਿੱਘਾ ਪਾਣੀ ਪੀਓ\n• ਆਰਾਮ ਕਰੋ\n• ਜੇ ਬੁਖਾਰ ਵੱਧੇ ਤਾਂ ਡਾਕਟਰ ਨਾਲ ਸੰਪਰਕ ਕਰੋ",
    remedy_default: "• ਪਾਣੀ ਜ਼ਿਆਦਾ ਪੀਓ\n• ਆਰਾਮ ਕਰੋ\n• ਜੇ ਸਮੱਸਿਆ ਬਣੀ ਰਹੇ ਤਾਂ ਡਾਕਟਰ ਨਾਲ ਮਿਲੋ",
    disclaimer: "ਇਹ ਮੈਡੀਕਲ ਡਾਇਗਨੋਸਿਸ ਨਹੀਂ ਹੈ। ਸਹੀ ਇਲਾਜ ਲਈ ਡਾਕਟਰ ਨਾਲ ਸਲਾਹ ਕਰੋ।",
    photo_uploaded: "📷 ਫੋਟੋ ਭੇਜੀ ਗਈ",
    video_uploaded: "🎥 ਵੀਡੀਓ ਭੇਜੀ ਗਈ",
    photo_received: "ਫੋਟੋ ਮਿਲ ਗਈ। ਕੀ ਤੁਸੀਂ ਇਸ ਬਾਰੇ ਹੋਰ ਦੱਸ ਸਕਦੇ ਹੋ?",
    video_received: "ਵੀਡੀਓ ਮਿਲ ਗਈ। ਕੀ ਤੁਸੀਂ ਇਸ ਬਾਰੇ ਹੋਰ ਦੱਸ ਸਕਦੇ ਹੋ?",
    consult_doctor: "ਹੁਣੇ ਡਾਕਟਰ ਨਾਲ ਗੱਲ ਕਰੋ",
    step: "ਕਦਮ",
    of: "ਦੇ",
    duration_options: ["ਅੱਜ", "2-3 ਦਿਨ", "1 ਹਫ਼ਤਾ+"],
    severity_options: ["ਹਲਕਾ", "ਦਰਮਿਆਨਾ", "ਤੇਜ਼"],
    yes_no: ["ਹਾਂ", "ਨਹੀਂ"],
    common_symptoms: [
        "ਬੁਖਾਰ",
        "ਖੰਘ",
        "ਸਿਰ ਦਰਦ",
        "ਸਰੀਰ ਦਰਦ",
        "ਪੇਟ ਦਰਦ",
        "ਫਫੋਲੇ",
        "ਅੱਖ ਦੀ ਸਮੱਸਿਆ",
        "ਕੰਨ ਦੀ ਸਮੱਸਿਆ",
        "ਜ਼ੁਕਾਮ",
        "ਗਲੇ ਵਿੱਚ ਦਰਦ",
    ],
};

pub(super) const HI: Strings = Strings {
    greeting: "नमस्ते! मैं आपकी स्वास्थ्य समस्या को समझना चाहता हूं। कृपया बताएं कि आप कैसा महसूस कर रहे हैं?",
    duration_question: "यह समस्या आपको कितने दिनों से है?",
    severity_question: "क्या दर्द तेज है या हल्का?",
    follow_up_fever: "क्या आपको खांसी भी है?",
    follow_up_cough: "क्या आपको बुखार भी है?",
    follow_up_headache: "क्या आपको मतली भी है?",
    follow_up_fallback: "क्या आपको कोई और लक्षण भी हैं?",
    suggestion_intro: "आपके लक्षणों के आधार पर, ये सुझाव हैं:",
    remedy_medium: "• गर्म पानी पिएं\n• आराम करें\n• अगर बुखार बढ़े तो डॉक्टर से मिलें",
    remedy_default: "• पानी ज्यादा पिएं\n• आराम करें\n• समस्या बनी रहे तो डॉक्टर से मिलें",
    disclaimer: "यह चिकित्सा निदान नहीं है। उचित उपचार के लिए डॉक्टर से सलाह लें।",
    photo_uploaded: "📷 फोटो भेजी गई",
    video_uploaded: "🎥 वीडियो भेजा गया",
    photo_received: "फोटो मिल गई। क्या आप इसके बारे में और बता सकते हैं?",
    video_received: "वीडियो मिल गया। क्या आप इसके बारे में और बता सकते हैं?",
    consult_doctor: "अभी डॉक्टर से बात करें",
    step: "चरण",
    of: "का",
    duration_options: ["आज", "2-3 दिन", "1 सप्ताह+"],
    severity_options: ["हल्का", "मध्यम", "तेज"],
    yes_no: ["हाँ", "नहीं"],
    common_symptoms: [
        "बुखार",
        "खांसी",
        "सिरदर्द",
        "शरीर दर्द",
        "पेट दर्द",
        "रैश",
        "आंख की समस्या",
        "कान की समस्या",
        "सर्दी",
        "गले में दर्द",
    ],
};
